//! HTTP listener configuration parsing from environment variables.

use std::env;

/// Serving environment configuration
#[derive(Debug, Clone)]
pub struct ServingEnvConfig {
    pub bind_address: String,
    pub port: u16,
}

impl Default for ServingEnvConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

impl ServingEnvConfig {
    pub fn from_env() -> Self {
        Self {
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse::<u16>()
                .unwrap_or(8000),
        }
    }
}
