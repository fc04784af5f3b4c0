//! Error types for address resolution.

use thiserror::Error;

/// Errors that can occur while turning an address into coordinates.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeocodeError {
    /// Address was empty or whitespace only.
    #[error("Address is empty")]
    EmptyAddress,

    /// Provider answered but had no match for the address.
    #[error("No coordinates found for address '{0}'")]
    NotFound(String),

    /// Network connectivity error (DNS, connection refused, etc.).
    #[error("Network error: {0}")]
    Network(String),

    /// Request exceeded deadline.
    #[error("Geocoding timeout after {0}ms")]
    Timeout(u64),

    /// Provider returned an error response (4xx, 5xx or an error status field).
    #[error("Geocoding provider error {status}: {message}")]
    Upstream { status: u16, message: String },

    /// Provider response doesn't match expected format.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Coordinates outside the valid latitude/longitude ranges.
    #[error("Invalid coordinates ({latitude}, {longitude})")]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    /// Geocoder configuration error (missing API key, bad URL).
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl GeocodeError {
    /// Failures that may succeed on a later attempt.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            GeocodeError::Network(_) | GeocodeError::Timeout(_) | GeocodeError::Upstream { .. }
        )
    }

    pub(crate) fn from_reqwest(e: reqwest::Error, timeout_ms: u64) -> Self {
        if e.is_timeout() {
            GeocodeError::Timeout(timeout_ms)
        } else {
            GeocodeError::Network(e.to_string())
        }
    }
}
