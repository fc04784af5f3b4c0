//! Recommendation Scorer.
//!
//! Ranks every eligible driver for one booking. The arithmetic lives in pure
//! functions ([`best_insertion`], [`nearest_distance`], [`ScoringWeights`]);
//! [`Scorer`] adds eligibility and address resolution around them.

mod error;
pub mod insertion;
mod recommendation;
mod weights;

pub use error::ScoringError;
pub use insertion::{best_insertion, best_insertion_from, nearest_distance, Insertion};
pub use recommendation::{rank, Recommendation};
pub use weights::{reason, ScoringWeights};

use chrono::NaiveDate;
use futures::future::join_all;
use std::fmt;
use std::sync::Arc;

use crate::config::ScoringConfig;
use crate::fleet::{Booking, Driver};
use crate::geo::{self, Coordinates, GeocodeError, Geocoder};

/// Why a driver is not considered for a booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ineligibility {
    Inactive,
    Unavailable(NaiveDate),
    AtCapacity { stops: usize, max: usize },
}

impl fmt::Display for Ineligibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ineligibility::Inactive => f.write_str("inactive"),
            Ineligibility::Unavailable(date) => write!(f, "unavailable on {}", date),
            Ineligibility::AtCapacity { stops, max } => {
                write!(f, "at capacity ({} of {} stops)", stops, max)
            }
        }
    }
}

/// Score one driver against a resolved delivery point.
///
/// `route` is the driver's delivery-date route, already resolved.
pub fn score_candidate(
    weights: &ScoringWeights,
    depot: Coordinates,
    driver: &Driver,
    route: &[Coordinates],
    delivery: Coordinates,
) -> Recommendation {
    let insertion = best_insertion(depot, route, delivery);
    let distance = nearest_distance(depot, route, delivery);
    let stops = route.len();
    let cost = weights.cost(distance, insertion.added_distance, stops);

    Recommendation {
        driver_id: driver.driver_id.clone(),
        driver_name: driver.name.clone(),
        score: weights.score(cost),
        distance_to_delivery: distance,
        route_disruption: insertion.added_distance,
        current_stops: stops,
        reason: reason(stops, distance, insertion.added_distance),
        insertion_index: insertion.index,
        route_version: driver.route_version,
    }
}

/// Scores drivers for bookings.
pub struct Scorer {
    geocoder: Arc<dyn Geocoder>,
    weights: ScoringWeights,
    depot: Coordinates,
    max_daily_stops: usize,
    max_recommendations: usize,
}

impl Scorer {
    pub fn new(geocoder: Arc<dyn Geocoder>, config: &ScoringConfig, depot: Coordinates) -> Self {
        Self {
            geocoder,
            weights: ScoringWeights::from(config),
            depot,
            max_daily_stops: config.max_daily_stops,
            max_recommendations: config.max_recommendations,
        }
    }

    pub fn depot(&self) -> Coordinates {
        self.depot
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn max_recommendations(&self) -> usize {
        self.max_recommendations
    }

    pub fn geocoder(&self) -> &Arc<dyn Geocoder> {
        &self.geocoder
    }

    /// Active, available on the delivery and pickup dates, and below the
    /// daily stop limit on the delivery date.
    pub fn check_eligibility(&self, driver: &Driver, booking: &Booking) -> Result<(), Ineligibility> {
        if !driver.is_active {
            return Err(Ineligibility::Inactive);
        }
        for date in [booking.delivery_date, booking.pickup_date] {
            if driver.is_unavailable_on(date) {
                return Err(Ineligibility::Unavailable(date));
            }
        }
        let stops = driver.load_on(booking.delivery_date);
        let max = driver.daily_capacity(self.max_daily_stops);
        if stops >= max {
            return Err(Ineligibility::AtCapacity { stops, max });
        }
        Ok(())
    }

    /// Resolve a driver's route for one date, in driving order.
    pub async fn resolve_route(&self, driver: &Driver, date: NaiveDate) -> Result<Vec<Coordinates>, GeocodeError> {
        let lookups = driver
            .stops_on(date)
            .map(|stop| geo::resolve(self.geocoder.as_ref(), &stop.location));
        join_all(lookups).await.into_iter().collect()
    }

    /// Recommendations for `booking`, best first, at most
    /// `max_recommendations` long.
    ///
    /// Returns `Ok(vec![])` when no driver is eligible. Drivers whose stops
    /// cannot be resolved are skipped with a warning; if that removes every
    /// eligible driver the result is `NoResolvableCandidates`.
    pub async fn recommend(&self, booking: &Booking, drivers: &[Driver]) -> Result<Vec<Recommendation>, ScoringError> {
        let mut ranked = self.rank_candidates(booking, drivers).await?;
        ranked.truncate(self.max_recommendations);
        Ok(ranked)
    }

    /// Every eligible, resolvable driver, ranked.
    pub async fn rank_candidates(
        &self,
        booking: &Booking,
        drivers: &[Driver],
    ) -> Result<Vec<Recommendation>, ScoringError> {
        let eligible: Vec<&Driver> = drivers
            .iter()
            .filter(|driver| match self.check_eligibility(driver, booking) {
                Ok(()) => true,
                Err(why) => {
                    tracing::debug!(
                        booking_id = %booking.booking_id,
                        driver_id = %driver.driver_id,
                        reason = %why,
                        "Driver not eligible"
                    );
                    false
                }
            })
            .collect();

        if eligible.is_empty() {
            return Ok(Vec::new());
        }

        let delivery = geo::resolve(self.geocoder.as_ref(), &booking.delivery)
            .await
            .map_err(|source| ScoringError::BookingUnresolvable {
                booking_id: booking.booking_id.clone(),
                source,
            })?;

        let routes = join_all(
            eligible
                .iter()
                .map(|driver| self.resolve_route(driver, booking.delivery_date)),
        )
        .await;

        let mut recommendations = Vec::with_capacity(eligible.len());
        let mut failed = 0usize;
        for (driver, route) in eligible.iter().zip(routes) {
            match route {
                Ok(route) => recommendations.push(score_candidate(
                    &self.weights,
                    self.depot,
                    driver,
                    &route,
                    delivery,
                )),
                Err(e) => {
                    failed += 1;
                    tracing::warn!(
                        booking_id = %booking.booking_id,
                        driver_id = %driver.driver_id,
                        error = %e,
                        "Excluding driver: route address resolution failed"
                    );
                }
            }
        }

        if recommendations.is_empty() {
            return Err(ScoringError::NoResolvableCandidates {
                booking_id: booking.booking_id.clone(),
                failed,
            });
        }

        rank(&mut recommendations);
        tracing::debug!(
            booking_id = %booking.booking_id,
            candidates = recommendations.len(),
            excluded = failed,
            "Scored drivers"
        );
        Ok(recommendations)
    }
}
