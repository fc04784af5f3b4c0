use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A scored candidate driver for one booking.
///
/// Produced fresh on every scoring call and never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub driver_id: String,
    pub driver_name: String,
    /// In (0, 1]; higher is better
    pub score: f64,
    /// Miles from the driver's nearest stop (or the depot) to the delivery
    pub distance_to_delivery: f64,
    /// Miles added to the driver's route at the best insertion point
    pub route_disruption: f64,
    /// Stops already on the driver's route for the delivery date
    pub current_stops: usize,
    pub reason: String,
    /// Best insertion position within the delivery-date route
    pub insertion_index: usize,
    /// Route version the insertion was computed against
    pub route_version: u64,
}

/// Score descending, then distance ascending, then driver id ascending.
pub fn compare(a: &Recommendation, b: &Recommendation) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.distance_to_delivery.total_cmp(&b.distance_to_delivery))
        .then_with(|| a.driver_id.cmp(&b.driver_id))
}

/// Sort recommendations into their canonical order.
pub fn rank(recommendations: &mut [Recommendation]) {
    recommendations.sort_by(compare);
}
