use std::env;
use std::time::Duration;

use tracing::warn;

/// Keycloak realm settings used to verify bearer tokens.
///
/// # Environment Variables
///
/// - `KEYCLOAK_HOST`: Keycloak base URL (default: `http://localhost:8081`)
/// - `KEYCLOAK_REALM_NAME`: Realm name (default: `prompt`)
/// - `KEYCLOAK_REQUEST_TIMEOUT_SECS`: Timeout of JWKS requests (default: 10)
/// - `KEYCLOAK_JWKS_REFRESH_SECS`: Minimum time between two JWKS fetches
///   triggered by unknown key ids (default: 30)
#[derive(Clone, Debug)]
pub struct KeycloakConfig {
    pub host: String,
    pub realm: String,
    /// Client whose `resource_access` roles are read from the token.
    pub client_id: String,
    /// Expected `azp` claim.
    pub authorized_party: String,
    pub request_timeout: Duration,
    pub jwks_refresh_interval: Duration,
}

impl Default for KeycloakConfig {
    fn default() -> Self {
        Self {
            host: "http://localhost:8081".to_string(),
            realm: "prompt".to_string(),
            client_id: "prompt-server".to_string(),
            authorized_party: "prompt-client".to_string(),
            request_timeout: Duration::from_secs(10),
            jwks_refresh_interval: Duration::from_secs(30),
        }
    }
}

impl KeycloakConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: normalize_host(
                &env::var("KEYCLOAK_HOST").unwrap_or_else(|_| defaults.host.clone()),
            ),
            realm: env::var("KEYCLOAK_REALM_NAME").unwrap_or(defaults.realm),
            request_timeout: secs_from_env("KEYCLOAK_REQUEST_TIMEOUT_SECS")
                .unwrap_or(defaults.request_timeout),
            jwks_refresh_interval: secs_from_env("KEYCLOAK_JWKS_REFRESH_SECS")
                .unwrap_or(defaults.jwks_refresh_interval),
            ..defaults
        }
    }

    /// Issuer URL tokens of this realm carry in their `iss` claim.
    pub fn issuer(&self) -> String {
        format!("{}/realms/{}", self.host.trim_end_matches('/'), self.realm)
    }

    /// JWKS endpoint of the realm.
    pub fn jwks_url(&self) -> String {
        format!("{}/protocol/openid-connect/certs", self.issuer())
    }
}

fn secs_from_env(name: &str) -> Option<Duration> {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_secs)
}

/// Prefixes `https://` when the configured host carries no scheme.
pub fn normalize_host(host: &str) -> String {
    if host.starts_with("http") {
        host.to_string()
    } else {
        warn!(host = %host, "Keycloak host does not start with http(s), adding https:// as prefix");
        format!("https://{}", host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_host_keeps_scheme() {
        assert_eq!(normalize_host("http://kc:8081"), "http://kc:8081");
        assert_eq!(normalize_host("https://kc.example.com"), "https://kc.example.com");
    }

    #[test]
    fn test_normalize_host_adds_https() {
        assert_eq!(normalize_host("kc.example.com"), "https://kc.example.com");
    }

    #[test]
    fn test_issuer_and_jwks_url() {
        let config = KeycloakConfig {
            host: "https://kc.example.com/".to_string(),
            ..Default::default()
        };
        assert_eq!(config.issuer(), "https://kc.example.com/realms/prompt");
        assert_eq!(
            config.jwks_url(),
            "https://kc.example.com/realms/prompt/protocol/openid-connect/certs"
        );
    }
}
