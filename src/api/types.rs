//! Request and response bodies for the admin API.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::fleet::{AssignmentStatus, Booking, BookingStatus};

/// A booking as shown in admin listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingSummary {
    pub booking_id: String,
    pub order_number: String,
    pub customer_name: String,
    pub delivery_address: String,
    pub delivery_date: NaiveDate,
    pub pickup_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_window: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pickup_window: Option<String>,
    pub status: BookingStatus,
    pub assignment_status: AssignmentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_driver_id: Option<String>,
}

impl From<Booking> for BookingSummary {
    fn from(booking: Booking) -> Self {
        let assignment_status = booking.assignment_status();
        Self {
            booking_id: booking.booking_id,
            order_number: booking.order_number,
            customer_name: booking.customer_name,
            delivery_address: booking.delivery.address,
            delivery_date: booking.delivery_date,
            pickup_date: booking.pickup_date,
            delivery_window: booking.delivery_window,
            pickup_window: booking.pickup_window,
            status: booking.status,
            assignment_status,
            assigned_driver_id: booking.assigned_driver_id,
        }
    }
}

/// GET /api/admin/drivers/unassigned-bookings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnassignedBookingsResponse {
    pub total: usize,
    pub bookings: Vec<BookingSummary>,
}

/// Query string for the proposal listing.
///
/// `status_filter` and `proposal_type` are accepted as aliases of `status`
/// and `type`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProposalListParams {
    pub status: Option<String>,
    pub status_filter: Option<String>,
    pub r#type: Option<String>,
    pub proposal_type: Option<String>,
    pub limit: Option<usize>,
}

impl ProposalListParams {
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref().or(self.status_filter.as_deref())
    }

    pub fn kind(&self) -> Option<&str> {
        self.r#type.as_deref().or(self.proposal_type.as_deref())
    }
}

/// POST /api/admin/phineas/execute-assignment
#[derive(Debug, Clone, Deserialize)]
pub struct ExecuteAssignmentRequest {
    pub proposal_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Location;

    #[test]
    fn test_booking_summary_flattens_location() {
        let booking = Booking::new(
            "bk-1",
            "ORD-1",
            "Alex",
            Location::new("12 Main St"),
            NaiveDate::from_ymd_opt(2030, 1, 10).unwrap(),
            NaiveDate::from_ymd_opt(2030, 1, 12).unwrap(),
        );
        let json = serde_json::to_value(BookingSummary::from(booking)).unwrap();
        assert_eq!(json["delivery_address"], "12 Main St");
        assert_eq!(json["assignment_status"], "unassigned");
        assert!(json.get("assigned_driver_id").is_none());
    }

    #[test]
    fn test_list_params_aliases() {
        let params: ProposalListParams =
            serde_json::from_value(serde_json::json!({"status_filter": "pending", "proposal_type": "driver_assignment"}))
                .unwrap();
        assert_eq!(params.status(), Some("pending"));
        assert_eq!(params.kind(), Some("driver_assignment"));

        let params: ProposalListParams =
            serde_json::from_value(serde_json::json!({"status": "approved", "status_filter": "pending"}))
                .unwrap();
        assert_eq!(params.status(), Some("approved"));
    }
}
