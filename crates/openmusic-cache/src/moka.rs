use async_trait::async_trait;
use moka::future::Cache as MokaStore;
use openmusic_core::cache::{Cache, CacheKey, Result};
use std::time::Duration;
use tracing::{debug, trace};
use typed_builder::TypedBuilder;

use crate::DEFAULT_TTL_SECS;

/// An in-process [`Cache`] built on Moka.
///
/// Used for single-node deployments and tests. Entries expire after the
/// configured TTL, mirroring the Redis backend.
#[derive(Debug, Clone)]
pub struct MokaCache {
    store: MokaStore<CacheKey, String>,
}

impl MokaCache {
    /// 10,000 entries with the default TTL.
    pub fn new() -> Self {
        CacheConfig::builder().build().into()
    }

    pub fn builder() -> CacheConfigBuilder {
        CacheConfig::builder()
    }

    /// Number of live entries, after pending maintenance has run.
    pub async fn entry_count(&self) -> u64 {
        self.store.run_pending_tasks().await;
        self.store.entry_count()
    }
}

impl Default for MokaCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cache for MokaCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<String>> {
        trace!(key = %key, "Fetching value from Moka cache");

        match self.store.get(key).await {
            Some(value) => {
                debug!(key = %key, "Cache hit in Moka");
                Ok(Some(value))
            }
            None => {
                trace!(key = %key, "Cache miss in Moka");
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &CacheKey, value: String) -> Result<()> {
        self.store.insert(key.clone(), value).await;
        debug!(key = %key, "Cached value in Moka");
        Ok(())
    }

    async fn del(&self, key: &CacheKey) -> Result<()> {
        self.store.invalidate(key).await;
        debug!(key = %key, "Removed value from Moka cache (if present)");
        Ok(())
    }
}

/// Configuration for a [`MokaCache`].
#[derive(Debug, TypedBuilder)]
pub struct CacheConfig {
    #[builder(default = 10_000)]
    max_capacity: u64,
    #[builder(default = Duration::from_secs(DEFAULT_TTL_SECS))]
    ttl: Duration,
}

impl From<CacheConfig> for MokaCache {
    fn from(config: CacheConfig) -> Self {
        let store = MokaStore::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(config.ttl)
            .build();
        Self { store }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_then_get() {
        let cache = MokaCache::new();
        let key = CacheKey::album("album-1");

        assert_eq!(cache.get(&key).await.unwrap(), None);
        cache.set(&key, "{\"id\":\"album-1\"}".to_string()).await.unwrap();
        assert_eq!(
            cache.get(&key).await.unwrap().as_deref(),
            Some("{\"id\":\"album-1\"}")
        );
    }

    #[tokio::test]
    async fn album_and_likes_keys_do_not_collide() {
        let cache = MokaCache::new();
        cache.set(&CacheKey::album("x"), "album".to_string()).await.unwrap();
        cache.set(&CacheKey::likes("x"), "3".to_string()).await.unwrap();

        assert_eq!(
            cache.get(&CacheKey::likes("x")).await.unwrap().as_deref(),
            Some("3")
        );
        assert_eq!(cache.entry_count().await, 2);
    }

    #[tokio::test]
    async fn del_is_idempotent() {
        let cache = MokaCache::new();
        let key = CacheKey::likes("album-1");

        cache.set(&key, "1".to_string()).await.unwrap();
        cache.del(&key).await.unwrap();
        cache.del(&key).await.unwrap();
        assert_eq!(cache.get(&key).await.unwrap(), None);
    }

    #[tokio::test]
    async fn entries_expire_after_ttl() {
        let cache: MokaCache = MokaCache::builder()
            .ttl(Duration::from_millis(50))
            .build()
            .into();
        let key = CacheKey::likes("album-1");

        cache.set(&key, "1".to_string()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(120)).await;
        assert_eq!(cache.get(&key).await.unwrap(), None);
    }
}
