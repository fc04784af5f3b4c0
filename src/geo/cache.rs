//! Memoizing geocoder wrapper.

use super::{normalize_address, Coordinates, GeocodeError, Geocoder};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Caches successful lookups of an inner geocoder.
///
/// Failures are never cached. Seeded entries are pinned and do not count
/// against `capacity`; learned entries evict an arbitrary entry once full.
pub struct CachingGeocoder {
    inner: Arc<dyn Geocoder>,
    pinned: DashMap<String, Coordinates>,
    learned: DashMap<String, Coordinates>,
    capacity: usize,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CachingGeocoder {
    pub fn new(inner: Arc<dyn Geocoder>, capacity: usize) -> Self {
        Self {
            inner,
            pinned: DashMap::new(),
            learned: DashMap::new(),
            capacity,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Pin known addresses (already normalized or not).
    pub fn seed<'a>(&self, entries: impl IntoIterator<Item = (&'a str, Coordinates)>) {
        for (address, coords) in entries {
            self.pinned.insert(normalize_address(address), coords);
        }
    }

    pub fn len(&self) -> usize {
        self.pinned.len() + self.learned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// (hits, misses) since creation.
    pub fn stats(&self) -> (u64, u64) {
        (
            self.hits.load(Ordering::Relaxed),
            self.misses.load(Ordering::Relaxed),
        )
    }

    fn cached(&self, key: &str) -> Option<Coordinates> {
        self.pinned
            .get(key)
            .map(|e| *e.value())
            .or_else(|| self.learned.get(key).map(|e| *e.value()))
    }

    fn remember(&self, key: String, coords: Coordinates) {
        if self.capacity == 0 {
            return;
        }
        if self.learned.len() >= self.capacity && !self.learned.contains_key(&key) {
            // Release the iterator guard before removing.
            let victim = self.learned.iter().next().map(|e| e.key().clone());
            if let Some(victim) = victim {
                self.learned.remove(&victim);
            }
        }
        self.learned.insert(key, coords);
    }
}

#[async_trait]
impl Geocoder for CachingGeocoder {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn geocode(&self, address: &str) -> Result<Coordinates, GeocodeError> {
        if address.trim().is_empty() {
            return Err(GeocodeError::EmptyAddress);
        }
        let key = normalize_address(address);
        if let Some(coords) = self.cached(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(coords);
        }
        if let Some(coords) = Coordinates::parse_literal(address) {
            return Ok(coords);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let coords = self.inner.geocode(address).await?;
        tracing::debug!(
            provider = self.inner.name(),
            address = %address,
            coordinates = %coords,
            "Geocoded address"
        );
        self.remember(key, coords);
        Ok(coords)
    }
}
