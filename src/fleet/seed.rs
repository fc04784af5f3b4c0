//! Building the fleet from configuration seed data.

use super::{Booking, Driver, FleetError, FleetStore, Stop, Unavailability};
use crate::config::{BookingConfig, DriverConfig};
use crate::geo::{Coordinates, Location};
use chrono::Utc;

fn location(
    address: &str,
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> Result<Location, String> {
    match (latitude, longitude) {
        (Some(lat), Some(lng)) => Coordinates::try_new(lat, lng)
            .map(|c| Location::with_coordinates(address, c))
            .map_err(|e| e.to_string()),
        (None, None) => Ok(Location::new(address)),
        _ => Err("latitude and longitude must be given together".to_string()),
    }
}

impl TryFrom<&DriverConfig> for Driver {
    type Error = FleetError;

    fn try_from(config: &DriverConfig) -> Result<Self, Self::Error> {
        let invalid = |message: String| FleetError::InvalidDriver {
            driver_id: config.id.clone(),
            message,
        };

        let mut stops = Vec::with_capacity(config.stops.len());
        for stop in &config.stops {
            stops.push(Stop {
                booking_id: stop.booking_id.clone(),
                kind: stop.kind,
                location: location(&stop.address, stop.latitude, stop.longitude).map_err(invalid)?,
                date: stop.date,
                window: stop.window.clone(),
            });
        }

        let mut unavailable = Vec::with_capacity(config.unavailable.len());
        for window in &config.unavailable {
            if window.to < window.from {
                return Err(invalid(format!(
                    "unavailability ends ({}) before it starts ({})",
                    window.to, window.from
                )));
            }
            unavailable.push(Unavailability {
                from: window.from,
                to: window.to,
                reason: window.reason.clone(),
            });
        }

        let mut driver = Driver::new(config.id.clone(), config.name.clone());
        driver.phone = config.phone.clone();
        driver.is_active = config.active;
        driver.max_daily_stops = config.max_daily_stops;
        driver.unavailable = unavailable;
        driver.stops = stops;
        driver.normalize_route();
        Ok(driver)
    }
}

impl TryFrom<&BookingConfig> for Booking {
    type Error = FleetError;

    fn try_from(config: &BookingConfig) -> Result<Self, Self::Error> {
        let delivery = location(
            &config.delivery_address,
            config.delivery_latitude,
            config.delivery_longitude,
        )
        .map_err(|message| FleetError::InvalidBooking {
            booking_id: config.id.clone(),
            message,
        })?;

        Ok(Booking {
            booking_id: config.id.clone(),
            order_number: config.order_number.clone(),
            customer_name: config.customer_name.clone(),
            delivery,
            pickup: config.pickup_address.as_deref().map(Location::new),
            delivery_date: config.delivery_date,
            pickup_date: config.pickup_date,
            delivery_window: config.delivery_window.clone(),
            pickup_window: config.pickup_window.clone(),
            status: config.status,
            assigned_driver_id: config.assigned_driver.clone(),
            pickup_driver_id: config.pickup_driver.clone(),
            created_at: Utc::now(),
        })
    }
}

impl FleetStore {
    /// Build a store from `[[drivers]]` and `[[bookings]]` seed data.
    ///
    /// # Errors
    ///
    /// Duplicate ids, malformed coordinates, pickup before delivery, and
    /// bookings referring to unknown drivers.
    pub fn from_config(drivers: &[DriverConfig], bookings: &[BookingConfig]) -> Result<Self, FleetError> {
        let store = FleetStore::new();

        for config in drivers {
            store.add_driver(Driver::try_from(config)?)?;
        }

        for config in bookings {
            let booking = Booking::try_from(config)?;
            for driver_id in [&booking.assigned_driver_id, &booking.pickup_driver_id]
                .into_iter()
                .flatten()
            {
                if store.get_driver(driver_id).is_none() {
                    return Err(FleetError::InvalidBooking {
                        booking_id: booking.booking_id.clone(),
                        message: format!("unknown driver '{}'", driver_id),
                    });
                }
            }
            store.add_booking(booking)?;
        }

        tracing::debug!(
            drivers = store.driver_count(),
            bookings = store.booking_count(),
            "Fleet loaded from configuration"
        );
        Ok(store)
    }
}
