//! Static address table geocoder.

use super::{normalize_address, Coordinates, GeocodeError, Geocoder};
use async_trait::async_trait;
use std::collections::HashMap;

/// Answers from a fixed address table and literal `"lat, lng"` addresses.
///
/// Keys are matched case- and whitespace-insensitively.
#[derive(Debug, Clone, Default)]
pub struct StaticGeocoder {
    entries: HashMap<String, Coordinates>,
}

impl StaticGeocoder {
    pub fn from_table(table: &HashMap<String, Coordinates>) -> Self {
        let entries = table
            .iter()
            .map(|(address, coords)| (normalize_address(address), *coords))
            .collect();
        Self { entries }
    }

    pub fn insert(&mut self, address: &str, coordinates: Coordinates) {
        self.entries.insert(normalize_address(address), coordinates);
    }

    /// Normalized entries, used to seed caches.
    pub fn entries(&self) -> impl Iterator<Item = (&str, Coordinates)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lookup(&self, address: &str) -> Result<Coordinates, GeocodeError> {
        if address.trim().is_empty() {
            return Err(GeocodeError::EmptyAddress);
        }
        if let Some(coords) = self.entries.get(&normalize_address(address)) {
            return Ok(*coords);
        }
        Coordinates::parse_literal(address).ok_or_else(|| GeocodeError::NotFound(address.to_string()))
    }
}

#[async_trait]
impl Geocoder for StaticGeocoder {
    fn name(&self) -> &str {
        "static"
    }

    async fn geocode(&self, address: &str) -> Result<Coordinates, GeocodeError> {
        self.lookup(address)
    }
}
