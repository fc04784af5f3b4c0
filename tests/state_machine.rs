//! Proposal lifecycle through the engine.
//!
//! Every (state, action) pair is driven end to end, and random operation
//! sequences are checked against the fleet invariants.

mod common;

use phineas::engine::{AssignmentEngine, EngineError};
use phineas::fleet::{BookingStatus, StopKind};
use phineas::proposals::{ProposalStatus, Transition};
use proptest::prelude::*;
use std::collections::HashMap;

const TRANSITIONS: [Transition; 3] = [Transition::Approve, Transition::Reject, Transition::Execute];

async fn apply(
    engine: &AssignmentEngine,
    id: &str,
    transition: Transition,
) -> Result<ProposalStatus, EngineError> {
    match transition {
        Transition::Approve => engine.approve_proposal(id).map(|p| p.status),
        Transition::Reject => engine.reject_proposal(id).map(|p| p.status),
        Transition::Execute => engine.execute_proposal(id).await.map(|o| o.proposal.status),
    }
}

/// Fresh scenario with its only proposal moved into `status`.
async fn proposal_in(status: ProposalStatus) -> (std::sync::Arc<AssignmentEngine>, String) {
    let engine = common::engine_from(common::SCENARIO_A);
    let id = engine.scan_assignments().await.unwrap().proposals[0].id.to_string();

    let path: &[Transition] = match status {
        ProposalStatus::Pending => &[],
        ProposalStatus::Approved => &[Transition::Approve],
        ProposalStatus::Rejected => &[Transition::Reject],
        ProposalStatus::Executed => &[Transition::Approve, Transition::Execute],
    };
    for step in path {
        apply(&engine, &id, *step).await.unwrap();
    }
    assert_eq!(engine.get_proposal(&id).unwrap().status, status);
    (engine, id)
}

#[tokio::test]
async fn test_every_state_action_pair() {
    for from in ProposalStatus::ALL {
        for transition in TRANSITIONS {
            let (engine, id) = proposal_in(from).await;
            let result = apply(&engine, &id, transition).await;

            match from.apply(transition) {
                Some(to) => {
                    assert_eq!(result.unwrap(), to, "{} + {}", from, transition);
                    assert_eq!(engine.get_proposal(&id).unwrap().status, to);
                }
                None => {
                    match result {
                        Err(EngineError::InvalidTransition { status, transition: t, .. }) => {
                            assert_eq!(status, from);
                            assert_eq!(t, transition);
                        }
                        other => panic!("{} + {}: expected invalid transition, got {:?}", from, transition, other),
                    }
                    assert_eq!(engine.get_proposal(&id).unwrap().status, from);
                }
            }
        }
    }
}

#[tokio::test]
async fn test_version_increments_on_each_transition() {
    let (engine, id) = proposal_in(ProposalStatus::Pending).await;
    let created = engine.get_proposal(&id).unwrap();

    let approved = engine.approve_proposal(&id).unwrap();
    assert_eq!(approved.version, created.version + 1);
    assert!(approved.approved_at.is_some());

    let executed = engine.execute_proposal(&id).await.unwrap().proposal;
    assert_eq!(executed.version, approved.version + 1);
    assert!(executed.updated_at >= approved.updated_at);
}

#[tokio::test]
async fn test_rejected_booking_is_proposed_again() {
    let (engine, id) = proposal_in(ProposalStatus::Rejected).await;

    let summary = engine.scan_assignments().await.unwrap();
    assert_eq!(summary.proposals_created, 1);
    assert_ne!(summary.proposals[0].id.to_string(), id);
}

#[tokio::test]
async fn test_cancelled_booking_cannot_be_executed() {
    let (engine, id) = proposal_in(ProposalStatus::Approved).await;
    engine
        .fleet()
        .set_booking_status("bk-1", BookingStatus::Cancelled)
        .unwrap();

    let err = engine.execute_proposal(&id).await.unwrap_err();
    assert!(matches!(err, EngineError::Conflict { .. }));
    assert_eq!(engine.get_proposal(&id).unwrap().status, ProposalStatus::Approved);
}

#[derive(Debug, Clone)]
enum Op {
    Scan,
    Approve(usize),
    Reject(usize),
    Execute(usize),
    Cancel(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Scan),
        (0usize..6).prop_map(Op::Approve),
        (0usize..6).prop_map(Op::Reject),
        (0usize..6).prop_map(Op::Execute),
        (1usize..4).prop_map(Op::Cancel),
    ]
}

async fn run_ops(ops: Vec<Op>) -> Result<(), TestCaseError> {
    let engine = common::engine_from(common::MIXED_FLEET);

    for op in ops {
        let ids: Vec<String> = engine
            .list_proposals(None, None, None)
            .unwrap()
            .iter()
            .map(|p| p.id.to_string())
            .collect();
        let pick = |i: usize| ids.get(i % ids.len().max(1)).cloned();

        match op {
            Op::Scan => {
                engine.scan_assignments().await.unwrap();
            }
            Op::Approve(i) => {
                if let Some(id) = pick(i) {
                    let _ = engine.approve_proposal(&id);
                }
            }
            Op::Reject(i) => {
                if let Some(id) = pick(i) {
                    let _ = engine.reject_proposal(&id);
                }
            }
            Op::Execute(i) => {
                if let Some(id) = pick(i) {
                    let _ = engine.execute_proposal(&id).await;
                }
            }
            Op::Cancel(n) => {
                let _ = engine
                    .fleet()
                    .set_booking_status(&format!("bk-{}", n), BookingStatus::Cancelled);
            }
        }

        // Stats and listing agree.
        let stats = engine.admin_stats();
        prop_assert_eq!(stats.unassigned_bookings, engine.list_unassigned_bookings().len());

        // At most one pending proposal per booking.
        let mut pending: HashMap<String, usize> = HashMap::new();
        for p in engine.list_proposals(Some("pending"), None, None).unwrap() {
            *pending.entry(p.booking_id).or_default() += 1;
        }
        prop_assert!(pending.values().all(|n| *n == 1));
        prop_assert_eq!(stats.pending_proposals, pending.len());

        // A booking is delivered by at most one route stop.
        let mut deliveries: HashMap<String, usize> = HashMap::new();
        for driver in engine.fleet().drivers() {
            for stop in driver.stops.iter().filter(|s| s.kind == StopKind::Delivery) {
                *deliveries.entry(stop.booking_id.clone()).or_default() += 1;
            }
        }
        prop_assert!(deliveries.values().all(|n| *n == 1));

        // Executed proposals match the fleet.
        for p in engine.list_proposals(Some("executed"), None, None).unwrap() {
            let booking = engine.fleet().get_booking(&p.booking_id).unwrap();
            prop_assert_eq!(booking.assigned_driver_id, p.driver_id);
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_operation_sequences_keep_invariants(ops in prop::collection::vec(op(), 1..24)) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        rt.block_on(run_ops(ops))?;
    }
}
