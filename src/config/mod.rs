//! Configuration module for Phineas
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`PHINEAS_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use phineas::config::PhineasConfig;
//!
//! // Load defaults
//! let config = PhineasConfig::default();
//! assert_eq!(config.server.port, 8000);
//!
//! // Parse from TOML
//! let toml = r#"
//! [server]
//! port = 9000
//! "#;
//! let config: PhineasConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.server.port, 9000);
//! ```

pub mod engine;
pub mod error;
pub mod fleet;
pub mod geocoding;
pub mod logging;
pub mod scoring;
pub mod server;

pub use engine::EngineConfig;
pub use error::ConfigError;
pub use fleet::{BookingConfig, DriverConfig, StopConfig, UnavailableConfig};
pub use geocoding::{GeocodingConfig, GeocodingProvider};
pub use logging::{LogFormat, LoggingConfig};
pub use scoring::{DepotConfig, ScoringConfig};
pub use server::ServerConfig;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Unified configuration for the Phineas server and CLI.
///
/// Aggregates server settings, engine bounds, scoring weights, the depot,
/// geocoding, logging, and the fleet seed data.
///
/// # Example
///
/// ```rust
/// use phineas::config::PhineasConfig;
///
/// let config = PhineasConfig::default();
/// assert_eq!(config.server.port, 8000);
/// assert_eq!(config.scoring.max_daily_stops, 8);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PhineasConfig {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Operation timeouts and listing limits
    pub engine: EngineConfig,
    /// Recommendation weights and eligibility limits
    pub scoring: ScoringConfig,
    /// Route origin for every driver
    pub depot: DepotConfig,
    /// Address resolution
    pub geocoding: GeocodingConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Driver seed data
    pub drivers: Vec<DriverConfig>,
    /// Booking seed data
    pub bookings: Vec<BookingConfig>,
}

impl PhineasConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supports PHINEAS_* environment variables for common settings.
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        // Server settings
        if let Ok(port) = std::env::var("PHINEAS_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }
        if let Ok(host) = std::env::var("PHINEAS_HOST") {
            self.server.host = host;
        }

        // Logging settings
        if let Ok(level) = std::env::var("PHINEAS_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("PHINEAS_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        // Engine and geocoding
        if let Ok(timeout) = std::env::var("PHINEAS_SCAN_TIMEOUT_MS") {
            if let Ok(t) = timeout.parse() {
                self.engine.scan_timeout_ms = t;
            }
        }
        if let Ok(provider) = std::env::var("PHINEAS_GEOCODER") {
            match provider.to_lowercase().as_str() {
                "static" => self.geocoding.provider = GeocodingProvider::Static,
                "nominatim" => self.geocoding.provider = GeocodingProvider::Nominatim,
                "google" => self.geocoding.provider = GeocodingProvider::Google,
                _ => {}
            }
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation {
                field: "server.port".to_string(),
                message: "port must be non-zero".to_string(),
            });
        }

        let timeouts = [
            ("engine.scan_timeout_ms", self.engine.scan_timeout_ms),
            ("engine.scoring_timeout_ms", self.engine.scoring_timeout_ms),
            ("engine.execute_timeout_ms", self.engine.execute_timeout_ms),
            ("geocoding.timeout_seconds", self.geocoding.timeout_seconds),
        ];
        for (field, value) in timeouts {
            if value == 0 {
                return Err(ConfigError::Validation {
                    field: field.to_string(),
                    message: "timeout must be non-zero".to_string(),
                });
            }
        }

        let request_timeout_ms = self.server.request_timeout_seconds.saturating_mul(1000);
        if request_timeout_ms <= self.engine.scan_timeout_ms {
            return Err(ConfigError::Validation {
                field: "server.request_timeout_seconds".to_string(),
                message: format!(
                    "must exceed engine.scan_timeout_ms ({} ms)",
                    self.engine.scan_timeout_ms
                ),
            });
        }

        if self.engine.default_proposal_limit == 0
            || self.engine.default_proposal_limit > self.engine.max_proposal_limit
        {
            return Err(ConfigError::Validation {
                field: "engine.default_proposal_limit".to_string(),
                message: format!(
                    "must be between 1 and max_proposal_limit ({})",
                    self.engine.max_proposal_limit
                ),
            });
        }

        self.scoring.validate()?;
        self.logging.validate()?;
        self.depot.validate()?;

        if self.geocoding.provider == GeocodingProvider::Google
            && self.geocoding.api_key_env.trim().is_empty()
        {
            return Err(ConfigError::Validation {
                field: "geocoding.api_key_env".to_string(),
                message: "google provider needs an API key variable name".to_string(),
            });
        }

        for (i, driver) in self.drivers.iter().enumerate() {
            if driver.id.trim().is_empty() {
                return Err(ConfigError::Validation {
                    field: format!("drivers[{}].id", i),
                    message: "id cannot be empty".to_string(),
                });
            }
        }
        for (i, booking) in self.bookings.iter().enumerate() {
            if booking.id.trim().is_empty() {
                return Err(ConfigError::Validation {
                    field: format!("bookings[{}].id", i),
                    message: "id cannot be empty".to_string(),
                });
            }
            if booking.pickup_date < booking.delivery_date {
                return Err(ConfigError::Validation {
                    field: format!("bookings[{}].pickup_date", i),
                    message: "pickup date cannot be before delivery date".to_string(),
                });
            }
        }

        Ok(())
    }
}
