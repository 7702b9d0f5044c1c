// 缓存失效协议
// 每次写操作提交后需要清除的缓存键，由变更操作显式返回

use std::collections::HashMap;
use std::sync::RwLock;
use serde_json::Value;

/// 缓存键
///
/// 写操作返回需要失效的键列表，调用层在事务提交后执行清除。
/// 事务回滚时不得清除任何键。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// 按Reference ID缓存的单笔支付
    PaymentByRef(String),
    /// 支付列表视图 (整体失效)
    PaymentList,
    /// Dashboard聚合统计
    DashboardStats,
}

impl CacheKey {
    /// 转换为缓存后端使用的字符串键
    pub fn as_key(&self) -> String {
        match self {
            CacheKey::PaymentByRef(reference_id) => format!("payment-by-ref:{}", reference_id),
            CacheKey::PaymentList => "payment-list".to_string(),
            CacheKey::DashboardStats => "dashboard-stats".to_string(),
        }
    }

    /// 支付写操作的标准失效集合
    ///
    /// 创建/完成/取消/退款/Webhook转换后都清除:
    /// 该支付的单笔缓存、列表视图、Dashboard统计
    pub fn for_payment_mutation(reference_id: &str) -> Vec<CacheKey> {
        vec![
            CacheKey::PaymentByRef(reference_id.to_string()),
            CacheKey::PaymentList,
            CacheKey::DashboardStats,
        ]
    }
}

/// 写操作结果，携带需要失效的缓存键
#[derive(Debug)]
pub struct Mutated<T> {
    /// 操作结果
    pub value: T,
    /// 提交后需要清除的缓存键
    pub invalidate: Vec<CacheKey>,
}

impl<T> Mutated<T> {
    pub fn new(value: T, invalidate: Vec<CacheKey>) -> Self {
        Self { value, invalidate }
    }
}

/// 进程内读穿缓存
///
/// 按字符串键缓存JSON值。生产部署可替换为Redis等外部缓存，
/// 键协议保持不变。
pub struct MemoryCache {
    entries: RwLock<HashMap<String, Value>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// 读取缓存值
    pub fn get(&self, key: &CacheKey) -> Option<Value> {
        self.entries
            .read()
            .ok()
            .and_then(|map| map.get(&key.as_key()).cloned())
    }

    /// 写入缓存值
    pub fn put(&self, key: &CacheKey, value: Value) {
        if let Ok(mut map) = self.entries.write() {
            map.insert(key.as_key(), value);
        }
    }

    /// 批量清除缓存键
    pub fn invalidate(&self, keys: &[CacheKey]) {
        if keys.is_empty() {
            return;
        }
        if let Ok(mut map) = self.entries.write() {
            for key in keys {
                map.remove(&key.as_key());
            }
        }
        log::debug!("Invalidated {} cache keys", keys.len());
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cache_key_format() {
        assert_eq!(
            CacheKey::PaymentByRef("PAY-123".to_string()).as_key(),
            "payment-by-ref:PAY-123"
        );
        assert_eq!(CacheKey::PaymentList.as_key(), "payment-list");
        assert_eq!(CacheKey::DashboardStats.as_key(), "dashboard-stats");
    }

    #[test]
    fn test_payment_mutation_invalidates_all_views() {
        let keys = CacheKey::for_payment_mutation("PAY-ABC");
        assert_eq!(keys.len(), 3);
        assert!(keys.contains(&CacheKey::PaymentByRef("PAY-ABC".to_string())));
        assert!(keys.contains(&CacheKey::PaymentList));
        assert!(keys.contains(&CacheKey::DashboardStats));
    }

    #[test]
    fn test_memory_cache_invalidation() {
        let cache = MemoryCache::new();
        let key = CacheKey::PaymentByRef("PAY-1".to_string());

        cache.put(&key, json!({"status": "PENDING"}));
        cache.put(&CacheKey::DashboardStats, json!({"total": 1}));
        assert!(cache.get(&key).is_some());

        cache.invalidate(&CacheKey::for_payment_mutation("PAY-1"));
        assert!(cache.get(&key).is_none());
        assert!(cache.get(&CacheKey::DashboardStats).is_none());
    }

    #[test]
    fn test_invalidate_only_listed_keys() {
        let cache = MemoryCache::new();
        let kept = CacheKey::PaymentByRef("PAY-KEEP".to_string());
        let purged = CacheKey::PaymentByRef("PAY-GONE".to_string());

        cache.put(&kept, json!(1));
        cache.put(&purged, json!(2));

        cache.invalidate(&[purged.clone()]);
        assert!(cache.get(&kept).is_some());
        assert!(cache.get(&purged).is_none());
    }
}
