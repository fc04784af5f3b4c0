//! Assignment scanner
//!
//! Walks the open bookings and turns the top recommendation for each into a
//! pending proposal. A scan only ever writes proposals; bookings and driver
//! routes are left alone.

use serde::Serialize;
use std::time::{Duration, Instant};

use super::{bounded, AssignmentEngine, EngineError};
use crate::fleet::Booking;
use crate::proposals::{
    DriverAssignment, Proposal, ProposalAction, ProposalError, ProposalKind,
};
use crate::scoring::Recommendation;

/// Outcome of one scan.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanSummary {
    pub proposals_created: usize,
    pub proposals: Vec<Proposal>,
    pub bookings_considered: usize,
    pub skipped_pending: usize,
    pub without_candidates: usize,
    pub scoring_failures: usize,
}

impl AssignmentEngine {
    /// Scan with the configured timeout.
    pub async fn scan_assignments(&self) -> Result<ScanSummary, EngineError> {
        self.scan_assignments_within(self.config.scan_timeout()).await
    }

    /// Scan with a caller-supplied bound.
    ///
    /// Proposals created before the deadline stay in place.
    pub async fn scan_assignments_within(&self, limit: Duration) -> Result<ScanSummary, EngineError> {
        metrics::counter!("phineas_scans_total").increment(1);
        let started = Instant::now();
        let result = bounded("scan", limit, self.run_scan()).await;
        metrics::histogram!("phineas_scan_duration_seconds").record(started.elapsed().as_secs_f64());

        if let Err(e) = &result {
            tracing::warn!(error = %e, "Assignment scan abandoned");
        }
        result
    }

    async fn run_scan(&self) -> ScanSummary {
        let today = self.clock.today();
        let drivers = self.fleet.active_drivers();
        let mut summary = ScanSummary::default();

        let open = self
            .fleet
            .unassigned_bookings()
            .into_iter()
            .filter(|b| b.delivery_date >= today);

        for booking in open {
            summary.bookings_considered += 1;

            if self
                .proposals
                .has_pending_for(&booking.booking_id, ProposalKind::DriverAssignment)
            {
                tracing::debug!(booking_id = %booking.booking_id, "Pending proposal exists, skipping");
                summary.skipped_pending += 1;
                continue;
            }

            let scoring_timeout = self.config.scoring_timeout();
            let ranked = match bounded("scoring", scoring_timeout, self.scorer.recommend(&booking, &drivers)).await {
                Ok(Ok(ranked)) => ranked,
                Ok(Err(e)) => {
                    summary.scoring_failures += 1;
                    metrics::counter!("phineas_scoring_failures_total").increment(1);
                    tracing::warn!(booking_id = %booking.booking_id, error = %e, "Scoring failed");
                    continue;
                }
                Err(e) => {
                    summary.scoring_failures += 1;
                    metrics::counter!("phineas_scoring_failures_total").increment(1);
                    tracing::warn!(booking_id = %booking.booking_id, error = %e, "Scoring timed out");
                    continue;
                }
            };

            let Some(top) = ranked.first() else {
                tracing::debug!(booking_id = %booking.booking_id, "No eligible drivers");
                summary.without_candidates += 1;
                continue;
            };

            match self.proposals.insert_pending(assignment_proposal(&booking, top)) {
                Ok(created) => {
                    metrics::counter!("phineas_proposals_created_total").increment(1);
                    tracing::info!(
                        proposal_id = %created.id,
                        booking_id = %booking.booking_id,
                        driver_id = %top.driver_id,
                        score = top.score,
                        "Created assignment proposal"
                    );
                    summary.proposals.push(created);
                }
                // Another scan got there first.
                Err(ProposalError::DuplicatePending { .. }) => summary.skipped_pending += 1,
                Err(e) => {
                    tracing::warn!(booking_id = %booking.booking_id, error = %e, "Could not store proposal");
                }
            }
        }

        summary.proposals_created = summary.proposals.len();
        tracing::info!(
            proposals_created = summary.proposals_created,
            bookings_considered = summary.bookings_considered,
            skipped_pending = summary.skipped_pending,
            without_candidates = summary.without_candidates,
            scoring_failures = summary.scoring_failures,
            "Assignment scan complete"
        );
        summary
    }
}

/// Pending driver-assignment proposal from the booking's top recommendation.
pub(crate) fn assignment_proposal(booking: &Booking, top: &Recommendation) -> Proposal {
    let title = format!(
        "Assign {} to delivery for {}",
        top.driver_name, booking.order_number
    );
    let description = format!(
        "Assign driver {} for delivery to {} on {}",
        top.driver_name, booking.delivery.address, booking.delivery_date
    );
    let reasoning = format!(
        "{}. Score {:.2}: {:.1}mi from nearest stop, {:.1}mi added to route, {} stops already scheduled that day.",
        top.reason, top.score, top.distance_to_delivery, top.route_disruption, top.current_stops
    );

    let action = ProposalAction::DriverAssignment(DriverAssignment {
        booking_id: booking.booking_id.clone(),
        order_number: booking.order_number.clone(),
        customer_name: booking.customer_name.clone(),
        delivery_address: booking.delivery.address.clone(),
        delivery_date: booking.delivery_date,
        pickup_date: booking.pickup_date,
        driver_id: top.driver_id.clone(),
        driver_name: top.driver_name.clone(),
        score: top.score,
        distance: top.distance_to_delivery,
        route_disruption: top.route_disruption,
        insertion_index: top.insertion_index,
        route_version: top.route_version,
    });

    Proposal::new(action, title, description, reasoning, top.score)
}
