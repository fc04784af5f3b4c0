//! Address resolution configuration

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::geo::nominatim::DEFAULT_USER_AGENT;
use crate::geo::Coordinates;

/// Geocoding provider selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GeocodingProvider {
    /// Only the configured address table and literal coordinates
    #[default]
    Static,
    /// OpenStreetMap Nominatim
    Nominatim,
    /// Google Geocoding API (needs an API key)
    Google,
}

/// Geocoding configuration
///
/// # Example
///
/// ```toml
/// [geocoding]
/// provider = "nominatim"
/// timeout_seconds = 5
///
/// [geocoding.addresses]
/// "100 Warehouse Way" = { latitude = 39.78, longitude = -89.65 }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocodingConfig {
    pub provider: GeocodingProvider,
    /// Override the provider's base URL (useful for self-hosted Nominatim)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    pub user_agent: String,
    /// Name of the environment variable holding the Google API key
    pub api_key_env: String,
    pub timeout_seconds: u64,
    /// Learned entries kept by the lookup cache
    pub cache_size: usize,
    /// Known addresses, consulted before any provider
    pub addresses: HashMap<String, Coordinates>,
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            provider: GeocodingProvider::Static,
            base_url: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            api_key_env: "GOOGLE_MAPS_API_KEY".to_string(),
            timeout_seconds: 5,
            cache_size: 1000,
            addresses: HashMap::new(),
        }
    }
}
