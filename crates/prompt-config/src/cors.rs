use std::env;

/// Origins allowed to call the phase server from a browser.
///
/// # Environment Variables
///
/// - `ALLOWED_ORIGINS`: Comma-separated origins
/// - `CLIENT_HOST`: Single origin, read when `ALLOWED_ORIGINS` is unset
#[derive(Clone, Debug)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        }
    }
}

impl CorsConfig {
    pub fn from_env() -> Self {
        let raw = env::var("ALLOWED_ORIGINS").or_else(|_| env::var("CLIENT_HOST"));
        match raw {
            Ok(value) => Self {
                allowed_origins: parse_origins(&value),
            },
            Err(_) => Self::default(),
        }
    }
}

fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
