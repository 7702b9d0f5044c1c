// 应用状态管理
// 共享的数据库连接池、配置、缓存和随机源

use std::sync::Arc;
use sqlx::PgPool;
use crate::cache::MemoryCache;
use crate::config::Config;
use crate::services::{MerchantService, PaymentService, WebhookService};
use crate::utils::crypto::{OsRandom, RandomSource};

/// 应用共享状态
pub struct AppState {
    /// 数据库连接池
    pub db_pool: PgPool,
    /// 应用配置
    pub config: Config,
    /// 进程内读穿缓存
    pub cache: MemoryCache,
    /// 密钥和ID生成的随机源
    pub random: Arc<dyn RandomSource>,
}

impl AppState {
    /// 创建新的应用状态
    pub fn new(db_pool: PgPool, config: Config) -> Self {
        Self {
            db_pool,
            config,
            cache: MemoryCache::new(),
            random: Arc::new(OsRandom),
        }
    }

    /// 商户服务
    pub fn merchant_service(&self) -> MerchantService {
        MerchantService::new(self.db_pool.clone(), Arc::clone(&self.random))
    }

    /// 支付服务
    pub fn payment_service(&self) -> PaymentService {
        PaymentService::new(self.db_pool.clone(), Arc::clone(&self.random))
    }

    /// Webhook服务
    pub fn webhook_service(&self) -> WebhookService {
        WebhookService::new(self.db_pool.clone(), Arc::clone(&self.random))
    }
}
