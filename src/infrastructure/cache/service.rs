//! Cache service trait and error types.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
    #[error("Cache operation error: {0}")]
    OperationError(String),
}

pub type CacheResult<T> = Result<T, CacheError>;

/// Key/value cache for rendered fragments such as CV previews.
///
/// Implementations are fail-open: backend errors are logged and reported as
/// misses, so a broken cache only costs a re-render.
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis with per-key TTL
/// - [`crate::infrastructure::cache::NullCache`] - caching disabled
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// `Ok(None)` on miss or backend error.
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Stores `value`; `ttl_seconds = None` uses the implementation default.
    async fn set(&self, key: &str, value: &str, ttl_seconds: Option<u64>) -> CacheResult<()>;

    async fn invalidate(&self, key: &str) -> CacheResult<()>;

    async fn health_check(&self) -> bool;
}

/// Cache key of a CV's rendered preview.
pub fn preview_key(cv_id: uuid::Uuid) -> String {
    format!("preview:{cv_id}")
}
