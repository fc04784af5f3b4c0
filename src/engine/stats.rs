use serde::{Deserialize, Serialize};

use crate::fleet::FleetSummary;

/// Counters for the admin dashboard.
///
/// `unassigned_bookings` always equals the length of the unassigned listing:
/// both come from the same predicate over one fleet snapshot, with no cache
/// in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminStats {
    pub unassigned_bookings: usize,
    pub total_bookings: usize,
    pub deliveries_today: usize,
    pub active_drivers: usize,
    pub pending_proposals: usize,
    pub approved_proposals: usize,
}

impl AdminStats {
    pub fn new(fleet: FleetSummary, pending_proposals: usize, approved_proposals: usize) -> Self {
        Self {
            unassigned_bookings: fleet.unassigned_bookings,
            total_bookings: fleet.total_bookings,
            deliveries_today: fleet.deliveries_on_date,
            active_drivers: fleet.active_drivers,
            pending_proposals,
            approved_proposals,
        }
    }
}
