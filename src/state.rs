use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use prompt_auth::{KeycloakVerifier, TokenVerifier};
use prompt_cache::{CacheConfig, LookupCache, NoopCache, RedisCache};
use prompt_config::SdkConfig;

use crate::core_service::{CachedLookups, CoreClient};
use crate::middleware::authorization::AuthorizationDecider;
use crate::resolution::ResolutionEngine;

/// Everything a phase server shares between requests. Read-only after
/// startup; each request builds its own role context.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<SdkConfig>,
    pub verifier: Arc<dyn TokenVerifier>,
    pub decider: AuthorizationDecider,
    pub resolution: ResolutionEngine,
}

impl AppState {
    pub fn new(
        config: SdkConfig,
        verifier: Arc<dyn TokenVerifier>,
        core: CoreClient,
        cache: Arc<dyn LookupCache>,
    ) -> Self {
        let lookups = Arc::new(CachedLookups::new(core.clone(), cache));
        Self {
            config: Arc::new(config),
            verifier,
            decider: AuthorizationDecider::new(lookups.clone(), lookups),
            resolution: ResolutionEngine::new(core),
        }
    }
}

/// Builds the production state: Keycloak verification, the core client and,
/// when `REDIS_URL` is set and the TTL is positive, a Redis lookup cache.
pub async fn init_app_state(config: SdkConfig) -> anyhow::Result<AppState> {
    let core = CoreClient::new(&config.core).context("failed to build core client")?;
    let verifier = Arc::new(
        KeycloakVerifier::new(config.keycloak.clone()).context("failed to build token verifier")?,
    );

    let cache_config = CacheConfig::from_env();
    let cache: Arc<dyn LookupCache> = match cache_config.active_redis_url() {
        Some(url) => {
            let cache = RedisCache::new(url, cache_config.ttl())
                .await
                .context("failed to connect to Redis")?;
            info!(ttl_secs = cache_config.ttl_seconds, "Caching authorization lookups in Redis");
            Arc::new(cache)
        }
        None => Arc::new(NoopCache),
    };

    Ok(AppState::new(config, verifier, core, cache))
}
