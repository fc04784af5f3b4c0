//! Shared fixtures for Phineas integration tests.
//!
//! Fleets are written as TOML, the same way operators describe them, and
//! addresses are literal `"lat, lng"` strings so the static geocoder can
//! resolve them without a network.

#![allow(dead_code)]

use chrono::NaiveDate;
use phineas::api::{create_router, AppState};
use phineas::config::PhineasConfig;
use phineas::engine::{AssignmentEngine, FixedClock};
use std::sync::Arc;

/// Booking about 2mi from the depot; D1 idle, D2 with three stops around it.
pub const SCENARIO_A: &str = r#"
[depot]
address = "Depot"
latitude = 0.0
longitude = 0.0

[[drivers]]
id = "d1"
name = "D1"

[[drivers]]
id = "d2"
name = "D2"

[[drivers.stops]]
booking_id = "d2-stop-0"
address = "0.02176, 0"
date = "2030-07-10"

[[drivers.stops]]
booking_id = "d2-stop-1"
address = "0.03624, 0"
date = "2030-07-10"

[[drivers.stops]]
booking_id = "d2-stop-2"
address = "0.04348, 0"
date = "2030-07-10"

[[bookings]]
id = "bk-1"
order_number = "ORD-1"
customer_name = "Alex"
delivery_address = "0.029, 0"
delivery_date = "2030-07-10"
pickup_date = "2030-07-12"
status = "confirmed"
"#;

/// Three open bookings, one closed, one already assigned; a single driver.
pub const MIXED_FLEET: &str = r#"
[depot]
address = "Depot"
latitude = 0.0
longitude = 0.0

[[drivers]]
id = "d1"
name = "D1"

[[drivers]]
id = "d9"
name = "Inactive"
active = false

[[bookings]]
id = "bk-1"
order_number = "ORD-1"
customer_name = "Alex"
delivery_address = "0.01, 0"
delivery_date = "2030-07-10"
pickup_date = "2030-07-12"
status = "confirmed"

[[bookings]]
id = "bk-2"
order_number = "ORD-2"
customer_name = "Jordan"
delivery_address = "0.02, 0"
delivery_date = "2030-07-11"
pickup_date = "2030-07-13"

[[bookings]]
id = "bk-3"
order_number = "ORD-3"
customer_name = "Casey"
delivery_address = "0.03, 0"
delivery_date = "2030-07-11"
pickup_date = "2030-07-11"
status = "active"

[[bookings]]
id = "bk-4"
order_number = "ORD-4"
customer_name = "Robin"
delivery_address = "0.04, 0"
delivery_date = "2030-07-12"
pickup_date = "2030-07-14"
status = "cancelled"

[[bookings]]
id = "bk-5"
order_number = "ORD-5"
customer_name = "Sam"
delivery_address = "0.05, 0"
delivery_date = "2030-07-12"
pickup_date = "2030-07-14"
status = "confirmed"
assigned_driver = "d1"
"#;

/// The date every fixture engine believes is today.
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2030, 7, 1).unwrap()
}

pub fn config_from(toml_src: &str) -> PhineasConfig {
    let config: PhineasConfig = toml::from_str(toml_src).expect("fixture config parses");
    config.validate().expect("fixture config is valid");
    config
}

pub fn engine_from(toml_src: &str) -> Arc<AssignmentEngine> {
    let config = config_from(toml_src);
    Arc::new(AssignmentEngine::from_config(&config, Arc::new(FixedClock::on(today()))).unwrap())
}

/// Router over `toml_src`, plus the engine behind it for direct assertions.
pub fn app_from(toml_src: &str) -> (axum::Router, Arc<AssignmentEngine>) {
    let config = Arc::new(config_from(toml_src));
    let engine = Arc::new(
        AssignmentEngine::from_config(&config, Arc::new(FixedClock::on(today()))).unwrap(),
    );
    let state = Arc::new(AppState::new(Arc::clone(&engine), config));
    (create_router(state), engine)
}
