//! # PROMPT Cache
//!
//! Optional caching of authorization lookups across requests.
//!
//! Out of the box every authorization check asks the core service again
//! ([`NoopCache`]). Deployments that can tolerate role changes taking effect
//! after a delay plug in [`RedisCache`] instead; entries expire after the
//! configured TTL.
//!
//! # Example
//!
//! ```ignore
//! use prompt_cache::{CacheConfig, RedisCache};
//!
//! let config = CacheConfig::from_env();
//! if let Some(url) = &config.redis_url {
//!     let cache = RedisCache::new(url, config.ttl()).await?;
//! }
//! ```

pub mod config;
pub mod keys;
pub mod redis;

use async_trait::async_trait;
use serde_json::Value;

pub use config::CacheConfig;
pub use crate::redis::RedisCache;

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Redis connection error: {0}")]
    Connection(#[from] ::redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Key/value store for lookup results.
///
/// Reads never fail: an unreachable store is a miss. Writes report errors so
/// callers can log them.
#[async_trait]
pub trait LookupCache: Send + Sync {
    async fn get_json(&self, key: &str) -> Option<Value>;

    async fn set_json(&self, key: &str, value: &Value) -> Result<(), CacheError>;
}

/// Caches nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCache;

#[async_trait]
impl LookupCache for NoopCache {
    async fn get_json(&self, _key: &str) -> Option<Value> {
        None
    }

    async fn set_json(&self, _key: &str, _value: &Value) -> Result<(), CacheError> {
        Ok(())
    }
}
