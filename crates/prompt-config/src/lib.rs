//! # PROMPT Config
//!
//! Configuration types for PROMPT phase modules, loaded from environment variables:
//!
//! - [`keycloak`]: Token verification settings (host, realm, client)
//! - [`core_service`]: Core service location and outbound request timeout
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`server`]: Listen address of a phase server
//!
//! [`SdkConfig`] bundles everything a phase module needs. It is built once at
//! startup and handed to the verifier, the authorization layer and the
//! resolution engine; nothing reads configuration from globals.
//!
//! # Example
//!
//! ```ignore
//! use prompt_config::SdkConfig;
//!
//! let config = SdkConfig::from_env();
//! println!("core at {}", config.core.base_url);
//! ```

pub mod core_service;
pub mod cors;
pub mod keycloak;
pub mod server;

// Re-export commonly used types at crate root
pub use core_service::CoreConfig;
pub use cors::CorsConfig;
pub use keycloak::KeycloakConfig;
pub use server::ServerConfig;

#[derive(Clone, Debug, Default)]
pub struct SdkConfig {
    pub keycloak: KeycloakConfig,
    pub core: CoreConfig,
    pub cors: CorsConfig,
    pub server: ServerConfig,
}

impl SdkConfig {
    pub fn from_env() -> Self {
        Self {
            keycloak: KeycloakConfig::from_env(),
            core: CoreConfig::from_env(),
            cors: CorsConfig::from_env(),
            server: ServerConfig::from_env(),
        }
    }
}
