//! Proposal executor
//!
//! Turns an approved driver-assignment proposal into a real assignment. All
//! I/O (address resolution) happens while planning; the commit itself is a
//! single synchronous critical section over the fleet store in which the
//! proposal is also moved to `executed`. Either both land or neither does.

use serde::Serialize;
use serde_json::json;
use std::time::Duration;
use uuid::Uuid;

use super::{bounded, parse_proposal_id, record_transition, AssignmentEngine, EngineError};
use crate::fleet::{AssignmentPlan, Booking, CommitError, Driver};
use crate::geo::{self, Location};
use crate::proposals::{DriverAssignment, Proposal, ProposalAction, ProposalStatus, Transition};
use crate::scoring::{best_insertion, best_insertion_from};

/// Result of a successful execution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionOutcome {
    pub message: String,
    pub proposal: Proposal,
}

impl AssignmentEngine {
    /// Execute with the configured timeout.
    pub async fn execute_proposal(&self, proposal_id: &str) -> Result<ExecutionOutcome, EngineError> {
        self.execute_proposal_within(proposal_id, self.config.execute_timeout())
            .await
    }

    /// Execute an approved proposal.
    ///
    /// Fails with `InvalidTransition` unless the proposal is approved, and
    /// with `Conflict` if the booking was assigned elsewhere or the driver's
    /// route moved under the plan; in both cases the proposal stays approved
    /// and no booking or driver state changes. Never retried internally.
    pub async fn execute_proposal_within(
        &self,
        proposal_id: &str,
        limit: Duration,
    ) -> Result<ExecutionOutcome, EngineError> {
        let id = parse_proposal_id(proposal_id)?;
        let result = bounded("execute", limit, self.run_execute(id))
            .await
            .and_then(|r| r);
        record_transition("execute", result.is_ok());

        if let Err(e) = &result {
            if matches!(e, EngineError::Conflict { .. }) {
                tracing::warn!(proposal_id = %id, error = %e, "Execution conflict");
            } else {
                tracing::debug!(proposal_id = %id, error = %e, "Execution refused");
            }
        }
        result
    }

    async fn run_execute(&self, id: Uuid) -> Result<ExecutionOutcome, EngineError> {
        let proposal = self.proposals.get(id).ok_or_else(|| EngineError::NotFound {
            entity: "proposal",
            id: id.to_string(),
        })?;
        if proposal.status != ProposalStatus::Approved {
            return Err(EngineError::InvalidTransition {
                proposal_id: id,
                status: proposal.status,
                transition: Transition::Execute,
            });
        }

        let action = match &proposal.action_data {
            ProposalAction::DriverAssignment(action) => action,
        };

        let booking = self
            .fleet
            .get_booking(&action.booking_id)
            .ok_or_else(|| EngineError::NotFound {
                entity: "booking",
                id: action.booking_id.clone(),
            })?;
        if let Some(existing) = &booking.assigned_driver_id {
            return Err(EngineError::conflict(format!(
                "booking {} was already assigned to driver {}",
                booking.booking_id, existing
            )));
        }
        if !booking.is_unassigned() {
            return Err(EngineError::conflict(format!(
                "booking {} is {} and cannot be assigned",
                booking.booking_id, booking.status
            )));
        }

        let driver = self
            .fleet
            .get_driver(&action.driver_id)
            .ok_or_else(|| EngineError::NotFound {
                entity: "driver",
                id: action.driver_id.clone(),
            })?;

        let plan = self.plan_assignment(&booking, &driver, action).await?;
        let expected_version = proposal.version;

        let executed = self
            .fleet
            .commit_assignment(&plan, |booking, driver| {
                let result = json!({
                    "booking_id": booking.booking_id,
                    "driver_id": driver.driver_id,
                    "delivery_date": booking.delivery_date,
                    "pickup_date": booking.pickup_date,
                    "delivery_stop_index": plan.delivery_index,
                    "pickup_stop_index": plan.pickup_index,
                    "route_version": driver.route_version,
                });
                self.proposals
                    .transition(id, Transition::Execute, Some(expected_version), |p| {
                        p.execution_result = Some(result)
                    })
            })
            .map_err(|e| match e {
                CommitError::Fleet(e) => EngineError::from(e),
                CommitError::Finalize(e) => EngineError::from(e),
            })?;

        tracing::info!(
            proposal_id = %id,
            booking_id = %action.booking_id,
            driver_id = %action.driver_id,
            delivery_index = plan.delivery_index,
            pickup_index = plan.pickup_index,
            "Assignment executed"
        );

        Ok(ExecutionOutcome {
            message: format!(
                "Successfully assigned {} to delivery for booking {}",
                action.driver_name, action.order_number
            ),
            proposal: executed,
        })
    }

    /// Work out where the delivery and pickup stops go.
    ///
    /// The recommended delivery index is reused only while the driver's
    /// route is the one it was computed against; otherwise it is recomputed.
    /// A same-day pickup is kept after its delivery.
    async fn plan_assignment(
        &self,
        booking: &Booking,
        driver: &Driver,
        action: &DriverAssignment,
    ) -> Result<AssignmentPlan, EngineError> {
        let geocoder = self.scorer.geocoder().as_ref();
        let depot = self.scorer.depot();
        let unresolvable = |e: geo::GeocodeError| EngineError::UpstreamResolution {
            booking_id: booking.booking_id.clone(),
            message: e.to_string(),
        };

        let delivery = geo::resolve(geocoder, &booking.delivery)
            .await
            .map_err(unresolvable)?;
        let pickup_location = booking.pickup_location();
        let pickup = geo::resolve(geocoder, pickup_location)
            .await
            .map_err(unresolvable)?;

        let mut delivery_route = self
            .scorer
            .resolve_route(driver, booking.delivery_date)
            .await
            .map_err(unresolvable)?;

        let delivery_index = if driver.route_version == action.route_version
            && action.insertion_index <= delivery_route.len()
        {
            action.insertion_index
        } else {
            tracing::debug!(
                booking_id = %booking.booking_id,
                driver_id = %driver.driver_id,
                planned_version = action.route_version,
                current_version = driver.route_version,
                "Route changed since recommendation, recomputing insertion"
            );
            best_insertion(depot, &delivery_route, delivery).index
        };

        let pickup_index = if booking.pickup_date == booking.delivery_date {
            delivery_route.insert(delivery_index, delivery);
            best_insertion_from(depot, &delivery_route, pickup, delivery_index + 1).index
        } else {
            let pickup_route = self
                .scorer
                .resolve_route(driver, booking.pickup_date)
                .await
                .map_err(unresolvable)?;
            best_insertion(depot, &pickup_route, pickup).index
        };

        Ok(AssignmentPlan {
            booking_id: booking.booking_id.clone(),
            driver_id: driver.driver_id.clone(),
            expected_route_version: driver.route_version,
            delivery_location: Location::with_coordinates(booking.delivery.address.clone(), delivery),
            delivery_index,
            pickup_location: Location::with_coordinates(pickup_location.address.clone(), pickup),
            pickup_index,
        })
    }
}
