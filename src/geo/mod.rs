//! Geographic primitives and address resolution.
//!
//! All distances inside the engine are great-circle miles computed with the
//! haversine formula. Addresses are resolved to [`Coordinates`] through a
//! [`Geocoder`], which is either a static table, a network provider
//! (Nominatim, Google), or a caching wrapper around one of those.

pub mod cache;
pub mod error;
pub mod google;
pub mod nominatim;
pub mod table;

pub use cache::CachingGeocoder;
pub use error::GeocodeError;
pub use google::GoogleGeocoder;
pub use nominatim::NominatimGeocoder;
pub use table::StaticGeocoder;

use crate::config::{GeocodingConfig, GeocodingProvider};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Kilometre to statute mile conversion factor.
pub const MILES_PER_KM: f64 = 0.621371;

/// A point on the Earth's surface in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Build coordinates, rejecting out-of-range or non-finite values.
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self, GeocodeError> {
        let coords = Self::new(latitude, longitude);
        if coords.is_valid() {
            Ok(coords)
        } else {
            Err(GeocodeError::InvalidCoordinates {
                latitude,
                longitude,
            })
        }
    }

    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Parse a literal `"lat, lng"` address such as `"40.7128, -74.0060"`.
    pub fn parse_literal(input: &str) -> Option<Self> {
        let (lat, lng) = input.split_once(',')?;
        let latitude = lat.trim().parse::<f64>().ok()?;
        let longitude = lng.trim().parse::<f64>().ok()?;
        Self::try_new(latitude, longitude).ok()
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}, {:.5}", self.latitude, self.longitude)
    }
}

/// Great-circle distance in kilometres.
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlng = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// Great-circle distance in miles.
///
/// # Examples
///
/// ```
/// use phineas::geo::{haversine_miles, Coordinates};
///
/// let a = Coordinates::new(0.0, 0.0);
/// assert_eq!(haversine_miles(a, a), 0.0);
///
/// // One degree of latitude is roughly 69 miles.
/// let b = Coordinates::new(1.0, 0.0);
/// assert!((haversine_miles(a, b) - 69.09).abs() < 0.1);
/// ```
pub fn haversine_miles(a: Coordinates, b: Coordinates) -> f64 {
    haversine_km(a, b) * MILES_PER_KM
}

/// An address, optionally with coordinates that were already resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

impl Location {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            coordinates: None,
        }
    }

    pub fn with_coordinates(address: impl Into<String>, coordinates: Coordinates) -> Self {
        Self {
            address: address.into(),
            coordinates: Some(coordinates),
        }
    }
}

/// Normalize an address for table lookups and cache keys.
pub fn normalize_address(address: &str) -> String {
    address
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Resolves free-text addresses to coordinates.
///
/// Object-safe; used as `Arc<dyn Geocoder>`. Dropping the returned future
/// aborts any in-flight HTTP request.
#[async_trait]
pub trait Geocoder: Send + Sync + 'static {
    /// Provider name for logs (e.g. "nominatim").
    fn name(&self) -> &str;

    /// Resolve one address.
    async fn geocode(&self, address: &str) -> Result<Coordinates, GeocodeError>;
}

/// Resolve a [`Location`], using its stored coordinates when present.
pub async fn resolve(geocoder: &dyn Geocoder, location: &Location) -> Result<Coordinates, GeocodeError> {
    match location.coordinates {
        Some(coords) if coords.is_valid() => Ok(coords),
        Some(coords) => Err(GeocodeError::InvalidCoordinates {
            latitude: coords.latitude,
            longitude: coords.longitude,
        }),
        None => geocoder.geocode(&location.address).await,
    }
}

/// Create the configured geocoder.
///
/// The static provider answers from `[geocoding.addresses]` only. Network
/// providers are wrapped in a [`CachingGeocoder`] pre-seeded with the same
/// table, so configured addresses never leave the process.
pub fn build_geocoder(config: &GeocodingConfig) -> Result<Arc<dyn Geocoder>, GeocodeError> {
    let table = StaticGeocoder::from_table(&config.addresses);

    let client = || {
        Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map(Arc::new)
            .map_err(|e| GeocodeError::Configuration(format!("HTTP client: {}", e)))
    };

    let upstream: Arc<dyn Geocoder> = match config.provider {
        GeocodingProvider::Static => return Ok(Arc::new(table)),
        GeocodingProvider::Nominatim => {
            let base_url = config
                .base_url
                .clone()
                .unwrap_or_else(|| nominatim::DEFAULT_BASE_URL.to_string());
            Arc::new(NominatimGeocoder::new(
                base_url,
                config.user_agent.clone(),
                client()?,
                config.timeout_seconds,
            ))
        }
        GeocodingProvider::Google => {
            let api_key = std::env::var(&config.api_key_env).map_err(|_| {
                GeocodeError::Configuration(format!(
                    "environment variable {} is not set",
                    config.api_key_env
                ))
            })?;
            let base_url = config
                .base_url
                .clone()
                .unwrap_or_else(|| google::DEFAULT_BASE_URL.to_string());
            Arc::new(GoogleGeocoder::new(
                base_url,
                api_key,
                client()?,
                config.timeout_seconds,
            ))
        }
    };

    let cache = CachingGeocoder::new(upstream, config.cache_size);
    cache.seed(table.entries());
    Ok(Arc::new(cache))
}
