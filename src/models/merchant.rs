// 商户数据模型
// 定义商户相关的数据结构和业务逻辑

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use chrono::{DateTime, Utc};

/// 商户信息模型
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Merchant {
    /// 商户唯一标识符
    pub id: Uuid,
    /// 商户名称
    pub name: String,
    /// 商户邮箱地址 (全局唯一)
    pub email: String,
    /// 联系电话
    pub phone: Option<String>,
    /// API访问密钥 (pk_live_前缀，全局唯一)
    pub api_key: String,
    /// API签名密钥 (不在API响应中返回)
    #[serde(skip_serializing)]
    pub api_secret: String,
    /// Webhook签名密钥 (不在API响应中返回)
    #[serde(skip_serializing)]
    pub webhook_secret: String,
    /// Webhook回调地址
    pub webhook_url: Option<String>,
    /// 是否活跃
    pub is_active: bool,
    /// 创建时间
    pub created_at: DateTime<Utc>,
    /// 更新时间
    pub updated_at: DateTime<Utc>,
}

impl Merchant {
    /// 转换为API响应格式
    ///
    /// # Arguments
    /// * `include_secrets` - 是否包含密钥明文
    ///   仅在创建和显式重新生成时为true，其余读取一律脱敏
    pub fn to_response(&self, include_secrets: bool) -> MerchantResponse {
        MerchantResponse {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            api_key: self.api_key.clone(),
            api_secret: include_secrets.then(|| self.api_secret.clone()),
            webhook_secret: include_secrets.then(|| self.webhook_secret.clone()),
            webhook_url: self.webhook_url.clone(),
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// 商户注册请求
#[derive(Debug, Deserialize)]
pub struct CreateMerchantRequest {
    /// 商户名称
    pub name: String,
    /// 商户邮箱
    pub email: String,
    /// 联系电话 (可选)
    pub phone: Option<String>,
    /// Webhook回调地址 (可选)
    pub webhook_url: Option<String>,
}

/// 商户查询响应
///
/// api_secret和webhook_secret只在创建/重新生成时返回一次
#[derive(Debug, Serialize)]
pub struct MerchantResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub api_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_secret: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_secret: Option<String>,
    pub webhook_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 商户状态更新请求
#[derive(Debug, Deserialize)]
pub struct UpdateMerchantStatusRequest {
    /// 新的活跃状态
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_merchant() -> Merchant {
        Merchant {
            id: Uuid::new_v4(),
            name: "Test Shop".to_string(),
            email: "shop@example.com".to_string(),
            phone: None,
            api_key: "pk_live_abc".to_string(),
            api_secret: "sk_live_secret".to_string(),
            webhook_secret: "whsec_secret".to_string(),
            webhook_url: Some("https://example.com/hook".to_string()),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_secrets_redacted_by_default() {
        let merchant = sample_merchant();

        let redacted = merchant.to_response(false);
        assert!(redacted.api_secret.is_none());
        assert!(redacted.webhook_secret.is_none());

        let full = merchant.to_response(true);
        assert_eq!(full.api_secret.as_deref(), Some("sk_live_secret"));
        assert_eq!(full.webhook_secret.as_deref(), Some("whsec_secret"));
    }

    #[test]
    fn test_serialized_merchant_never_contains_secrets() {
        let merchant = sample_merchant();
        let json = serde_json::to_string(&merchant).unwrap();
        assert!(!json.contains("sk_live_secret"));
        assert!(!json.contains("whsec_secret"));
    }
}
