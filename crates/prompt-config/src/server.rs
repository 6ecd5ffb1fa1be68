use std::env;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// `SERVER_ADDRESS`, default `0.0.0.0:8080`.
    pub address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "0.0.0.0:8080".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            address: env::var("SERVER_ADDRESS").unwrap_or_else(|_| Self::default().address),
        }
    }
}
