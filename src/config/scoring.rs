//! Recommendation scoring configuration

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;
use crate::geo::Coordinates;

/// Weights and limits used by the recommendation scorer.
///
/// Lower combined cost means a better candidate:
/// `cost = distance * distance_weight + disruption * disruption_weight + stops * load_penalty_per_stop`,
/// and `score = 1 / (1 + cost / score_scale)`.
///
/// # Example
///
/// ```toml
/// [scoring]
/// distance_weight = 0.4
/// disruption_weight = 0.6
/// load_penalty_per_stop = 0.5
/// score_scale = 1.0
/// max_daily_stops = 8
/// max_recommendations = 5
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Weight of the distance (miles) from the driver's nearest stop.
    ///
    /// Default: 0.4
    pub distance_weight: f64,

    /// Weight of the added route miles at the best insertion point.
    ///
    /// Default: 0.6
    pub disruption_weight: f64,

    /// Cost added per stop the driver already has that day.
    ///
    /// Default: 0.5
    pub load_penalty_per_stop: f64,

    /// Cost at which the score drops to 0.5.
    ///
    /// Default: 1.0
    pub score_scale: f64,

    /// Drivers with this many stops on the delivery date are not eligible.
    ///
    /// Default: 8
    pub max_daily_stops: usize,

    /// Recommendations returned per booking.
    ///
    /// Default: 5
    pub max_recommendations: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            distance_weight: 0.4,
            disruption_weight: 0.6,
            load_penalty_per_stop: 0.5,
            score_scale: 1.0,
            max_daily_stops: 8,
            max_recommendations: 5,
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let weights = [
            ("scoring.distance_weight", self.distance_weight),
            ("scoring.disruption_weight", self.disruption_weight),
            ("scoring.load_penalty_per_stop", self.load_penalty_per_stop),
        ];
        for (field, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Validation {
                    field: field.to_string(),
                    message: format!("must be a non-negative number, got {}", value),
                });
            }
        }
        if !self.score_scale.is_finite() || self.score_scale <= 0.0 {
            return Err(ConfigError::Validation {
                field: "scoring.score_scale".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        if self.max_daily_stops == 0 {
            return Err(ConfigError::Validation {
                field: "scoring.max_daily_stops".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.max_recommendations == 0 {
            return Err(ConfigError::Validation {
                field: "scoring.max_recommendations".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Where every driver's day starts.
///
/// Used as the origin of each route and as the distance reference for
/// drivers without stops.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DepotConfig {
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl DepotConfig {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.coordinates().is_valid() {
            return Err(ConfigError::Validation {
                field: "depot".to_string(),
                message: format!(
                    "invalid coordinates ({}, {})",
                    self.latitude, self.longitude
                ),
            });
        }
        Ok(())
    }
}

impl Default for DepotConfig {
    fn default() -> Self {
        Self {
            address: "Depot".to_string(),
            latitude: 0.0,
            longitude: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoring_config_defaults() {
        let config = ScoringConfig::default();
        assert_eq!(config.distance_weight, 0.4);
        assert_eq!(config.disruption_weight, 0.6);
        assert_eq!(config.load_penalty_per_stop, 0.5);
        assert_eq!(config.max_daily_stops, 8);
        assert_eq!(config.max_recommendations, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_scoring_config_rejects_negative_weight() {
        let config = ScoringConfig {
            disruption_weight: -0.1,
            ..ScoringConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation { ref field, .. }) if field == "scoring.disruption_weight"
        ));
    }

    #[test]
    fn test_scoring_config_rejects_nan() {
        let config = ScoringConfig {
            distance_weight: f64::NAN,
            ..ScoringConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_scoring_config_rejects_zero_scale() {
        let config = ScoringConfig {
            score_scale: 0.0,
            ..ScoringConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_depot_validation() {
        let depot = DepotConfig {
            latitude: 95.0,
            ..DepotConfig::default()
        };
        assert!(depot.validate().is_err());
        assert!(DepotConfig::default().validate().is_ok());
    }
}
