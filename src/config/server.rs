//! Server configuration

use serde::{Deserialize, Serialize};

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_seconds: u64,
    /// Maximum accepted request body in bytes
    pub max_body_bytes: usize,
    /// Allowed CORS origins for the admin frontend; empty disables CORS
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            request_timeout_seconds: 45,
            max_body_bytes: 64 * 1024,
            cors_origins: Vec::new(),
        }
    }
}
