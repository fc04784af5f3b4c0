//! Fleet seed data: drivers and bookings loaded at startup

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::fleet::{BookingStatus, StopKind};

fn default_true() -> bool {
    true
}

/// A driver as declared in `[[drivers]]`.
///
/// # Example
///
/// ```toml
/// [[drivers]]
/// id = "drv-1"
/// name = "Dana"
///
/// [[drivers.stops]]
/// booking_id = "bk-7"
/// kind = "delivery"
/// address = "12 Main St"
/// date = "2026-10-20"
///
/// [[drivers.unavailable]]
/// from = "2026-10-24"
/// to = "2026-10-26"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverConfig {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default = "default_true")]
    pub active: bool,
    /// Per-driver override of `scoring.max_daily_stops`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_daily_stops: Option<usize>,
    #[serde(default)]
    pub unavailable: Vec<UnavailableConfig>,
    #[serde(default)]
    pub stops: Vec<StopConfig>,
}

/// Inclusive date range a driver cannot work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnavailableConfig {
    pub from: NaiveDate,
    pub to: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// A stop already on a driver's route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopConfig {
    pub booking_id: String,
    #[serde(default)]
    pub kind: StopKind,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<String>,
}

/// A booking as declared in `[[bookings]]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfig {
    pub id: String,
    pub order_number: String,
    pub customer_name: String,
    pub delivery_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_longitude: Option<f64>,
    /// Defaults to the delivery address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pickup_address: Option<String>,
    pub delivery_date: NaiveDate,
    pub pickup_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_window: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pickup_window: Option<String>,
    #[serde(default)]
    pub status: BookingStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_driver: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pickup_driver: Option<String>,
}
