//! Cache for rendered CV previews.
//!
//! - [`RedisCache`] - used when `REDIS_URL` / `REDIS_HOST` is configured
//! - [`NullCache`] - no-op fallback

mod null_cache;
mod redis_cache;
mod service;

pub use null_cache::NullCache;
pub use redis_cache::RedisCache;
pub use service::{CacheError, CacheResult, CacheService, preview_key};

#[cfg(test)]
pub use service::MockCacheService;
