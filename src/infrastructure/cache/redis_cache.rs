//! Redis-backed cache implementation.

use super::service::{CacheError, CacheResult, CacheService};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, info, warn};

const KEY_PREFIX: &str = "cv-builder:";

/// Fail-open Redis cache sharing one multiplexed `ConnectionManager`.
pub struct RedisCache {
    conn: ConnectionManager,
    default_ttl: u64,
}

impl RedisCache {
    /// Connects and verifies the server with a PING.
    ///
    /// `default_ttl_seconds` applies when [`CacheService::set`] is called
    /// without a TTL (`CACHE_TTL_SECONDS`).
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid or the
    /// server does not answer.
    pub async fn connect(redis_url: &str, default_ttl_seconds: u64) -> CacheResult<Self> {
        info!(
            "Connecting to Redis at {}",
            crate::config::mask_connection_string(redis_url)
        );

        let client = Client::open(redis_url)
            .map_err(|e| CacheError::ConnectionError(format!("invalid Redis URL: {e}")))?;

        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| CacheError::ConnectionError(e.to_string()))?;

        let mut probe = manager.clone();
        probe
            .ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("PING failed: {e}")))?;

        info!("Connected to Redis");

        Ok(Self {
            conn: manager,
            default_ttl: default_ttl_seconds,
        })
    }

    fn key(&self, key: &str) -> String {
        format!("{KEY_PREFIX}{key}")
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let mut conn = self.conn.clone();

        match conn.get::<_, Option<String>>(self.key(key)).await {
            Ok(hit) => {
                debug!(key, hit = hit.is_some(), "Cache lookup");
                Ok(hit)
            }
            Err(e) => {
                warn!(key, error = %e, "Redis GET failed");
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &str, value: &str, ttl_seconds: Option<u64>) -> CacheResult<()> {
        let mut conn = self.conn.clone();
        let ttl = ttl_seconds.unwrap_or(self.default_ttl);

        if let Err(e) = conn.set_ex::<_, _, ()>(self.key(key), value, ttl).await {
            warn!(key, error = %e, "Redis SET failed");
        } else {
            debug!(key, ttl, bytes = value.len(), "Cache SET");
        }

        Ok(())
    }

    async fn invalidate(&self, key: &str) -> CacheResult<()> {
        let mut conn = self.conn.clone();

        match conn.del::<_, i64>(self.key(key)).await {
            Ok(removed) if removed > 0 => debug!(key, "Cache INVALIDATE"),
            Ok(_) => {}
            Err(e) => warn!(key, error = %e, "Redis DEL failed"),
        }

        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.conn.clone();
        conn.ping::<()>().await.is_ok()
    }
}
