use async_trait::async_trait;
use openmusic_core::cache::{Cache, CacheKey, Result};
use openmusic_core::CacheError;
use redis::AsyncCommands;
use tracing::{debug, trace, warn};

use crate::DEFAULT_TTL_SECS;

/// A Redis-backed [`Cache`].
///
/// Values are stored as JSON strings under `<prefix><key>` and every write
/// sets a TTL, so a missed invalidation heals itself eventually.
#[derive(Debug, Clone)]
pub struct RedisCache {
    conn: redis::aio::MultiplexedConnection,
    key_prefix: String,
    ttl_secs: u64,
}

fn map_redis_error(operation: &str, err: redis::RedisError) -> CacheError {
    let message = format!("{operation}: {err}");
    if err.is_timeout() {
        CacheError::Timeout(message)
    } else if err.is_io_error() || err.is_connection_dropped() || err.is_connection_refusal() {
        CacheError::Unavailable(message)
    } else {
        CacheError::Operation(message)
    }
}

impl RedisCache {
    pub fn new(conn: redis::aio::MultiplexedConnection) -> Self {
        Self {
            conn,
            key_prefix: "openmusic:".to_string(),
            ttl_secs: DEFAULT_TTL_SECS,
        }
    }

    /// Opens a multiplexed connection to `url`.
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)
            .map_err(|e| map_redis_error("invalid Redis url", e))?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| map_redis_error("failed to connect to Redis", e))?;
        Ok(Self::new(conn))
    }

    pub fn with_prefix(mut self, key_prefix: impl Into<String>) -> Self {
        self.key_prefix = key_prefix.into();
        self
    }

    /// A TTL of zero is clamped to one second; Redis rejects `SETEX 0`.
    pub fn with_ttl_secs(mut self, ttl_secs: u64) -> Self {
        self.ttl_secs = ttl_secs.max(1);
        self
    }

    fn cache_key(&self, key: &CacheKey) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<String>> {
        let redis_key = self.cache_key(key);
        trace!(key = %key, "Fetching value from Redis cache");

        let mut conn = self.conn.clone();
        match conn.get::<_, Option<String>>(&redis_key).await {
            Ok(Some(value)) => {
                debug!(key = %key, "Cache hit in Redis");
                Ok(Some(value))
            }
            Ok(None) => {
                trace!(key = %key, "Cache miss in Redis");
                Ok(None)
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Redis error on get");
                Err(map_redis_error("failed to fetch value from Redis", e))
            }
        }
    }

    async fn set(&self, key: &CacheKey, value: String) -> Result<()> {
        let redis_key = self.cache_key(key);
        trace!(key = %key, ttl_secs = self.ttl_secs, "Storing value in Redis cache");

        let mut conn = self.conn.clone();
        match conn
            .set_ex::<_, _, ()>(&redis_key, value, self.ttl_secs)
            .await
        {
            Ok(()) => {
                debug!(key = %key, "Cached value in Redis");
                Ok(())
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to cache value in Redis");
                Err(map_redis_error("failed to write value to Redis", e))
            }
        }
    }

    async fn del(&self, key: &CacheKey) -> Result<()> {
        let redis_key = self.cache_key(key);
        trace!(key = %key, "Removing value from Redis cache");

        let mut conn = self.conn.clone();
        match conn.del::<_, ()>(&redis_key).await {
            Ok(()) => {
                debug!(key = %key, "Removed value from Redis cache");
                Ok(())
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to remove value from Redis cache");
                Err(map_redis_error("failed to delete value from Redis", e))
            }
        }
    }
}
