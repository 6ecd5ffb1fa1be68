//! Lookup cache configuration.

use std::env;
use std::time::Duration;

/// # Environment Variables
///
/// - `REDIS_URL`: Redis connection URL. Unset disables caching.
/// - `LOOKUP_CACHE_TTL_SECONDS`: Lifetime of cached lookups (default: `60`).
///   `0` disables caching.
#[derive(Clone, Debug)]
pub struct CacheConfig {
    pub redis_url: Option<String>,
    pub ttl_seconds: u64,
}

impl CacheConfig {
    pub fn from_env() -> Self {
        Self {
            redis_url: env::var("REDIS_URL").ok().filter(|v| !v.is_empty()),
            ttl_seconds: env::var("LOOKUP_CACHE_TTL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
        }
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }

    /// Redis URL to cache against, or `None` when caching is off.
    pub fn active_redis_url(&self) -> Option<&str> {
        match self.ttl_seconds {
            0 => None,
            _ => self.redis_url.as_deref(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            redis_url: None,
            ttl_seconds: 60,
        }
    }
}
