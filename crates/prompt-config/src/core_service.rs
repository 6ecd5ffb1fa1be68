use std::env;
use std::time::Duration;

/// Location of the PROMPT core service.
///
/// # Environment Variables
///
/// - `CORE_HOST`: Core base URL without the `/api` suffix (default: `http://localhost:8080`)
/// - `CORE_REQUEST_TIMEOUT_SECS`: Timeout for each outbound request (default: `10`)
#[derive(Clone, Debug)]
pub struct CoreConfig {
    pub base_url: String,
    pub request_timeout: Duration,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl CoreConfig {
    pub fn from_env() -> Self {
        Self {
            base_url: env::var("CORE_HOST")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            request_timeout: env::var("CORE_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(Duration::from_secs(10)),
        }
    }

    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            ..Default::default()
        }
    }
}
