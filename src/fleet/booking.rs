//! Booking types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::geo::Location;

/// Lifecycle status of a rental booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    OutForDelivery,
    Active,
    PickupScheduled,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::OutForDelivery => "out_for_delivery",
            BookingStatus::Active => "active",
            BookingStatus::PickupScheduled => "pickup_scheduled",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    /// Completed and cancelled bookings never need a driver.
    pub fn is_closed(&self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "out_for_delivery" => Ok(BookingStatus::OutForDelivery),
            "active" => Ok(BookingStatus::Active),
            "pickup_scheduled" => Ok(BookingStatus::PickupScheduled),
            "completed" => Ok(BookingStatus::Completed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            _ => Err(format!("Invalid booking status: {}", s)),
        }
    }
}

/// Whether a booking still needs a delivery driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    Unassigned,
    Assigned,
}

/// A customer order that needs a delivery and a later pickup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub booking_id: String,
    pub order_number: String,
    pub customer_name: String,
    pub delivery: Location,
    /// Pickup location when it differs from the delivery address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pickup: Option<Location>,
    pub delivery_date: NaiveDate,
    pub pickup_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_window: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pickup_window: Option<String>,
    pub status: BookingStatus,
    pub assigned_driver_id: Option<String>,
    pub pickup_driver_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn new(
        booking_id: impl Into<String>,
        order_number: impl Into<String>,
        customer_name: impl Into<String>,
        delivery: Location,
        delivery_date: NaiveDate,
        pickup_date: NaiveDate,
    ) -> Self {
        Self {
            booking_id: booking_id.into(),
            order_number: order_number.into(),
            customer_name: customer_name.into(),
            delivery,
            pickup: None,
            delivery_date,
            pickup_date,
            delivery_window: None,
            pickup_window: None,
            status: BookingStatus::Pending,
            assigned_driver_id: None,
            pickup_driver_id: None,
            created_at: Utc::now(),
        }
    }

    pub fn assignment_status(&self) -> AssignmentStatus {
        if self.assigned_driver_id.is_some() {
            AssignmentStatus::Assigned
        } else {
            AssignmentStatus::Unassigned
        }
    }

    /// No delivery driver yet and not cancelled or completed.
    ///
    /// This is the single predicate behind the unassigned listing, the admin
    /// statistics and execute-time re-validation.
    pub fn is_unassigned(&self) -> bool {
        self.assigned_driver_id.is_none() && !self.status.is_closed()
    }

    pub fn pickup_location(&self) -> &Location {
        self.pickup.as_ref().unwrap_or(&self.delivery)
    }
}
