use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use tracing::debug;

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;

#[derive(Clone)]
struct CachedValue {
    data: String,
    ttl: Option<Duration>,
}

/// 按条目设置过期时间，未指定时使用构建时的全局 TTL
struct PerEntryExpiry;

impl Expiry<String, CachedValue> for PerEntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CachedValue,
        _created_at: Instant,
    ) -> Option<Duration> {
        value.ttl
    }
}

pub struct MokaCacheWrapper {
    inner: Cache<String, CachedValue>,
}

impl MokaCacheWrapper {
    pub fn new() -> Self {
        let config = AppConfig::get();
        Self::with_settings(config.cache.memory.max_capacity, config.cache.default_ttl)
    }

    pub fn with_settings(max_capacity: u64, default_ttl_secs: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(Duration::from_secs(default_ttl_secs))
            .expire_after(PerEntryExpiry)
            .build();

        debug!(
            "MokaCacheWrapper initialized with max capacity: {}",
            max_capacity
        );
        Self { inner }
    }
}

impl Default for MokaCacheWrapper {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectCache for MokaCacheWrapper {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        match self.inner.get(key).await {
            Some(value) => CacheResult::Found(value.data),
            None => {
                debug!("Key not found in cache: {}", key);
                CacheResult::NotFound
            }
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) {
        let ttl = (ttl != 0).then(|| Duration::from_secs(ttl));
        self.inner
            .insert(key, CachedValue { data: value, ttl })
            .await;
    }

    async fn remove(&self, key: &str) {
        self.inner.invalidate(key).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_get_remove() {
        let cache = MokaCacheWrapper::with_settings(100, 60);
        assert!(matches!(cache.get_raw("k").await, CacheResult::NotFound));

        cache.insert_raw("k".into(), "v".into(), 0).await;
        match cache.get_raw("k").await {
            CacheResult::Found(v) => assert_eq!(v, "v"),
            _ => panic!("expected cached value"),
        }

        cache.remove("k").await;
        assert!(matches!(cache.get_raw("k").await, CacheResult::NotFound));
    }

    #[tokio::test]
    async fn test_per_entry_ttl_expires() {
        let cache = MokaCacheWrapper::with_settings(100, 60);
        cache.insert_raw("short".into(), "v".into(), 1).await;
        std::thread::sleep(Duration::from_millis(1100));
        assert!(matches!(cache.get_raw("short").await, CacheResult::NotFound));
    }
}
