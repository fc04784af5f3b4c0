//! Booking store and driver registry.
//!
//! Thread-safe in-memory storage of bookings and drivers. A single lock
//! covers both maps so that listings, statistics and assignment commits all
//! observe one consistent state.

mod booking;
mod driver;
mod error;
mod seed;

pub use booking::*;
pub use driver::*;
pub use error::*;

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::geo::Location;

#[derive(Debug, Default)]
struct FleetState {
    bookings: BTreeMap<String, Booking>,
    drivers: BTreeMap<String, Driver>,
}

/// Counts taken from one consistent view of the fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FleetSummary {
    pub total_bookings: usize,
    pub unassigned_bookings: usize,
    pub deliveries_on_date: usize,
    pub total_drivers: usize,
    pub active_drivers: usize,
}

/// Everything needed to apply one driver assignment.
///
/// Indices are positions within the driver's route for the stop's date.
/// `pickup_index` is relative to the route after the delivery stop has been
/// inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentPlan {
    pub booking_id: String,
    pub driver_id: String,
    pub expected_route_version: u64,
    pub delivery_location: Location,
    pub delivery_index: usize,
    pub pickup_location: Location,
    pub pickup_index: usize,
}

/// Failure of [`FleetStore::commit_assignment`].
#[derive(Debug)]
pub enum CommitError<E> {
    /// Re-validation failed; nothing was written.
    Fleet(FleetError),
    /// The finalize step failed; nothing was written.
    Finalize(E),
}

impl<E> From<FleetError> for CommitError<E> {
    fn from(err: FleetError) -> Self {
        CommitError::Fleet(err)
    }
}

/// The Fleet Store holds all bookings and drivers.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use phineas::fleet::{Booking, Driver, FleetStore};
/// use phineas::geo::Location;
///
/// let store = FleetStore::new();
/// store.add_driver(Driver::new("drv-1", "Dana")).unwrap();
/// store
///     .add_booking(Booking::new(
///         "bk-1",
///         "ORD-1",
///         "Alex",
///         Location::new("12 Main St"),
///         NaiveDate::from_ymd_opt(2030, 1, 10).unwrap(),
///         NaiveDate::from_ymd_opt(2030, 1, 12).unwrap(),
///     ))
///     .unwrap();
///
/// assert_eq!(store.unassigned_bookings().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct FleetStore {
    state: RwLock<FleetState>,
}

impl FleetStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, FleetState> {
        match self.state.read() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::warn!("Fleet store lock poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, FleetState> {
        match self.state.write() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::warn!("Fleet store lock poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    /// Add a booking.
    ///
    /// # Errors
    ///
    /// `DuplicateBooking` for a known id, `InvalidBooking` when the pickup
    /// date precedes the delivery date.
    pub fn add_booking(&self, booking: Booking) -> Result<(), FleetError> {
        if booking.pickup_date < booking.delivery_date {
            return Err(FleetError::InvalidBooking {
                booking_id: booking.booking_id,
                message: "pickup date is before delivery date".to_string(),
            });
        }
        let mut state = self.write();
        if state.bookings.contains_key(&booking.booking_id) {
            return Err(FleetError::DuplicateBooking(booking.booking_id));
        }
        state.bookings.insert(booking.booking_id.clone(), booking);
        Ok(())
    }

    /// Add a driver. The route is normalized into date order.
    pub fn add_driver(&self, mut driver: Driver) -> Result<(), FleetError> {
        driver.normalize_route();
        let mut state = self.write();
        if state.drivers.contains_key(&driver.driver_id) {
            return Err(FleetError::DuplicateDriver(driver.driver_id));
        }
        state.drivers.insert(driver.driver_id.clone(), driver);
        Ok(())
    }

    pub fn get_booking(&self, booking_id: &str) -> Option<Booking> {
        self.read().bookings.get(booking_id).cloned()
    }

    pub fn get_driver(&self, driver_id: &str) -> Option<Driver> {
        self.read().drivers.get(driver_id).cloned()
    }

    /// All bookings ordered by id.
    pub fn bookings(&self) -> Vec<Booking> {
        self.read().bookings.values().cloned().collect()
    }

    /// All drivers ordered by id.
    pub fn drivers(&self) -> Vec<Driver> {
        self.read().drivers.values().cloned().collect()
    }

    /// Active drivers ordered by id.
    pub fn active_drivers(&self) -> Vec<Driver> {
        self.read()
            .drivers
            .values()
            .filter(|d| d.is_active)
            .cloned()
            .collect()
    }

    /// Bookings that still need a delivery driver, by delivery date then id.
    pub fn unassigned_bookings(&self) -> Vec<Booking> {
        let state = self.read();
        let mut bookings: Vec<Booking> = state
            .bookings
            .values()
            .filter(|b| b.is_unassigned())
            .cloned()
            .collect();
        bookings.sort_by(|a, b| {
            a.delivery_date
                .cmp(&b.delivery_date)
                .then_with(|| a.booking_id.cmp(&b.booking_id))
        });
        bookings
    }

    /// Counts over one consistent view, with deliveries counted for `date`.
    pub fn summary(&self, date: NaiveDate) -> FleetSummary {
        let state = self.read();
        FleetSummary {
            total_bookings: state.bookings.len(),
            unassigned_bookings: state.bookings.values().filter(|b| b.is_unassigned()).count(),
            deliveries_on_date: state
                .bookings
                .values()
                .filter(|b| b.delivery_date == date && !b.status.is_closed())
                .count(),
            total_drivers: state.drivers.len(),
            active_drivers: state.drivers.values().filter(|d| d.is_active).count(),
        }
    }

    /// Change a booking's lifecycle status (cancellation, completion, ...).
    pub fn set_booking_status(&self, booking_id: &str, status: BookingStatus) -> Result<(), FleetError> {
        let mut state = self.write();
        let booking = state
            .bookings
            .get_mut(booking_id)
            .ok_or_else(|| FleetError::BookingNotFound(booking_id.to_string()))?;
        booking.status = status;
        Ok(())
    }

    /// Record a delivery driver chosen outside the proposal flow.
    ///
    /// Does not touch the driver's route.
    pub fn assign_driver(&self, booking_id: &str, driver_id: &str) -> Result<(), FleetError> {
        let mut state = self.write();
        if !state.drivers.contains_key(driver_id) {
            return Err(FleetError::DriverNotFound(driver_id.to_string()));
        }
        let booking = state
            .bookings
            .get_mut(booking_id)
            .ok_or_else(|| FleetError::BookingNotFound(booking_id.to_string()))?;
        if let Some(existing) = &booking.assigned_driver_id {
            return Err(FleetError::AlreadyAssigned {
                booking_id: booking_id.to_string(),
                driver_id: existing.clone(),
            });
        }
        booking.assigned_driver_id = Some(driver_id.to_string());
        Ok(())
    }

    /// Apply an assignment as one all-or-nothing step.
    ///
    /// Under the store's write lock: re-validates that the booking is still
    /// unassigned and the driver's route is unchanged, builds the updated
    /// booking and driver, and runs `finalize` against them. Only when
    /// `finalize` succeeds are the updates written back. There are no await
    /// points, so a cancelled caller can never observe a partial write.
    pub fn commit_assignment<T, E, F>(
        &self,
        plan: &AssignmentPlan,
        finalize: F,
    ) -> Result<T, CommitError<E>>
    where
        F: FnOnce(&Booking, &Driver) -> Result<T, E>,
    {
        let mut state = self.write();

        let booking = state
            .bookings
            .get(&plan.booking_id)
            .ok_or_else(|| FleetError::BookingNotFound(plan.booking_id.clone()))?;
        if let Some(existing) = &booking.assigned_driver_id {
            return Err(FleetError::AlreadyAssigned {
                booking_id: plan.booking_id.clone(),
                driver_id: existing.clone(),
            }
            .into());
        }
        if booking.status.is_closed() {
            return Err(FleetError::BookingClosed {
                booking_id: plan.booking_id.clone(),
                status: booking.status,
            }
            .into());
        }

        let driver = state
            .drivers
            .get(&plan.driver_id)
            .ok_or_else(|| FleetError::DriverNotFound(plan.driver_id.clone()))?;
        if !driver.is_active {
            return Err(FleetError::DriverInactive(plan.driver_id.clone()).into());
        }
        if driver.route_version != plan.expected_route_version {
            return Err(FleetError::RouteChanged {
                driver_id: plan.driver_id.clone(),
                expected: plan.expected_route_version,
                actual: driver.route_version,
            }
            .into());
        }

        let mut updated_booking = booking.clone();
        updated_booking.assigned_driver_id = Some(plan.driver_id.clone());
        updated_booking.pickup_driver_id = Some(plan.driver_id.clone());

        let mut updated_driver = driver.clone();
        updated_driver.insert_stop(
            plan.delivery_index,
            Stop {
                booking_id: plan.booking_id.clone(),
                kind: StopKind::Delivery,
                location: plan.delivery_location.clone(),
                date: booking.delivery_date,
                window: booking.delivery_window.clone(),
            },
        );
        updated_driver.insert_stop(
            plan.pickup_index,
            Stop {
                booking_id: plan.booking_id.clone(),
                kind: StopKind::Pickup,
                location: plan.pickup_location.clone(),
                date: booking.pickup_date,
                window: booking.pickup_window.clone(),
            },
        );

        let outcome = finalize(&updated_booking, &updated_driver).map_err(CommitError::Finalize)?;

        state
            .bookings
            .insert(updated_booking.booking_id.clone(), updated_booking);
        state
            .drivers
            .insert(updated_driver.driver_id.clone(), updated_driver);
        Ok(outcome)
    }

    pub fn booking_count(&self) -> usize {
        self.read().bookings.len()
    }

    pub fn driver_count(&self) -> usize {
        self.read().drivers.len()
    }
}
