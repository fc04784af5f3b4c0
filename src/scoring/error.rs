use crate::geo::GeocodeError;

/// Errors that can occur while scoring a booking
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    #[error("could not resolve delivery address for booking {booking_id}: {source}")]
    BookingUnresolvable {
        booking_id: String,
        #[source]
        source: GeocodeError,
    },

    #[error("no resolvable candidates for booking {booking_id}: all {failed} eligible drivers failed address resolution")]
    NoResolvableCandidates { booking_id: String, failed: usize },
}

impl ScoringError {
    pub fn booking_id(&self) -> &str {
        match self {
            ScoringError::BookingUnresolvable { booking_id, .. } => booking_id,
            ScoringError::NoResolvableCandidates { booking_id, .. } => booking_id,
        }
    }
}
