//! Assignment engine.
//!
//! The operations an administrator performs: list unassigned bookings, get
//! driver recommendations, scan for proposals, and review (approve, reject,
//! execute) them. Every operation validates its identifiers before touching
//! a store, and the long-running ones are bounded by a timeout.

mod clock;
mod error;
mod executor;
mod scanner;
mod stats;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::EngineError;
pub use executor::ExecutionOutcome;
pub use scanner::ScanSummary;
pub use stats::AdminStats;

use chrono::NaiveDate;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::config::{EngineConfig, PhineasConfig};
use crate::fleet::{Booking, FleetStore};
use crate::geo;
use crate::proposals::{Proposal, ProposalQuery, ProposalStatus, ProposalStore};
use crate::scoring::{Recommendation, Scorer};

/// Longest accepted booking identifier.
pub const MAX_BOOKING_ID_LEN: usize = 64;

/// Recommendations for one booking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationSet {
    pub booking_id: String,
    pub delivery_address: String,
    pub delivery_date: NaiveDate,
    pub recommendations: Vec<Recommendation>,
}

/// Entry point for every admin operation.
pub struct AssignmentEngine {
    fleet: Arc<FleetStore>,
    proposals: Arc<ProposalStore>,
    scorer: Scorer,
    clock: Arc<dyn Clock>,
    config: EngineConfig,
}

impl AssignmentEngine {
    pub fn new(
        fleet: Arc<FleetStore>,
        proposals: Arc<ProposalStore>,
        scorer: Scorer,
        clock: Arc<dyn Clock>,
        config: EngineConfig,
    ) -> Self {
        Self {
            fleet,
            proposals,
            scorer,
            clock,
            config,
        }
    }

    /// Engine over the configured fleet, geocoder and scoring weights, with
    /// an empty proposal store.
    pub fn from_config(
        config: &PhineasConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let geocoder = geo::build_geocoder(&config.geocoding)?;
        let fleet = FleetStore::from_config(&config.drivers, &config.bookings)?;
        let scorer = Scorer::new(geocoder, &config.scoring, config.depot.coordinates());

        tracing::debug!(
            bookings = fleet.booking_count(),
            drivers = fleet.driver_count(),
            geocoder = ?config.geocoding.provider,
            "Loaded fleet from configuration"
        );

        Ok(Self::new(
            Arc::new(fleet),
            Arc::new(ProposalStore::new()),
            scorer,
            clock,
            config.engine.clone(),
        ))
    }

    pub fn fleet(&self) -> &Arc<FleetStore> {
        &self.fleet
    }

    pub fn proposals(&self) -> &Arc<ProposalStore> {
        &self.proposals
    }

    pub fn scorer(&self) -> &Scorer {
        &self.scorer
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Bookings with no delivery driver that are still open, ordered by
    /// delivery date then booking id.
    pub fn list_unassigned_bookings(&self) -> Vec<Booking> {
        self.fleet.unassigned_bookings()
    }

    /// Ranked drivers for a booking, bounded by the scoring timeout.
    ///
    /// An empty list means no driver is eligible; it is not an error.
    pub async fn driver_recommendations(&self, booking_id: &str) -> Result<RecommendationSet, EngineError> {
        self.driver_recommendations_within(booking_id, self.config.scoring_timeout())
            .await
    }

    pub async fn driver_recommendations_within(
        &self,
        booking_id: &str,
        limit: Duration,
    ) -> Result<RecommendationSet, EngineError> {
        validate_booking_id(booking_id)?;
        let booking = self
            .fleet
            .get_booking(booking_id)
            .ok_or_else(|| EngineError::NotFound {
                entity: "booking",
                id: booking_id.to_string(),
            })?;

        let drivers = self.fleet.active_drivers();
        let recommendations = bounded("scoring", limit, self.scorer.recommend(&booking, &drivers))
            .await?
            .map_err(|e| {
                metrics::counter!("phineas_scoring_failures_total").increment(1);
                tracing::warn!(booking_id = %booking_id, error = %e, "Scoring failed");
                EngineError::from(e)
            })?;

        Ok(RecommendationSet {
            booking_id: booking.booking_id,
            delivery_address: booking.delivery.address,
            delivery_date: booking.delivery_date,
            recommendations,
        })
    }

    /// Proposals matching raw filter values, most recent first.
    ///
    /// Filters are validated before the store is read.
    pub fn list_proposals(
        &self,
        status: Option<&str>,
        kind: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<Proposal>, EngineError> {
        let query = ProposalQuery::parse(
            status,
            kind,
            limit,
            self.config.default_proposal_limit,
            self.config.max_proposal_limit,
        )?;
        Ok(self.proposals.list(&query))
    }

    pub fn get_proposal(&self, proposal_id: &str) -> Result<Proposal, EngineError> {
        let id = parse_proposal_id(proposal_id)?;
        self.proposals.get(id).ok_or_else(|| EngineError::NotFound {
            entity: "proposal",
            id: id.to_string(),
        })
    }

    /// pending -> approved
    pub fn approve_proposal(&self, proposal_id: &str) -> Result<Proposal, EngineError> {
        let id = parse_proposal_id(proposal_id)?;
        let result = self.proposals.approve(id);
        record_transition("approve", result.is_ok());
        let proposal = result?;
        tracing::info!(
            proposal_id = %id,
            booking_id = %proposal.booking_id,
            "Proposal approved"
        );
        Ok(proposal)
    }

    /// pending -> rejected
    pub fn reject_proposal(&self, proposal_id: &str) -> Result<Proposal, EngineError> {
        let id = parse_proposal_id(proposal_id)?;
        let result = self.proposals.reject(id);
        record_transition("reject", result.is_ok());
        let proposal = result?;
        tracing::info!(
            proposal_id = %id,
            booking_id = %proposal.booking_id,
            "Proposal rejected"
        );
        Ok(proposal)
    }

    pub fn admin_stats(&self) -> AdminStats {
        let fleet = self.fleet.summary(self.clock.today());
        AdminStats::new(
            fleet,
            self.proposals.count_by_status(ProposalStatus::Pending),
            self.proposals.count_by_status(ProposalStatus::Approved),
        )
    }
}

/// Proposal ids are UUIDs.
pub fn parse_proposal_id(raw: &str) -> Result<Uuid, EngineError> {
    Uuid::parse_str(raw.trim()).map_err(|_| {
        EngineError::validation("proposal_id", format!("'{}' is not a valid proposal id", raw))
    })
}

/// Booking ids are non-empty, at most 64 characters, without whitespace.
pub fn validate_booking_id(raw: &str) -> Result<(), EngineError> {
    if raw.is_empty() {
        return Err(EngineError::validation("booking_id", "must not be empty"));
    }
    if raw.chars().count() > MAX_BOOKING_ID_LEN {
        return Err(EngineError::validation(
            "booking_id",
            format!("must be at most {} characters", MAX_BOOKING_ID_LEN),
        ));
    }
    if raw.chars().any(char::is_whitespace) {
        return Err(EngineError::validation(
            "booking_id",
            "must not contain whitespace",
        ));
    }
    Ok(())
}

/// Run `fut` with a deadline. A timed-out future is dropped, never resumed.
async fn bounded<F: Future>(
    operation: &'static str,
    limit: Duration,
    fut: F,
) -> Result<F::Output, EngineError> {
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| EngineError::Timeout {
            operation,
            timeout_ms: limit.as_millis() as u64,
        })
}

fn record_transition(transition: &'static str, succeeded: bool) {
    let outcome = if succeeded { "success" } else { "failure" };
    metrics::counter!(
        "phineas_transitions_total",
        "transition" => transition,
        "outcome" => outcome
    )
    .increment(1);
}
