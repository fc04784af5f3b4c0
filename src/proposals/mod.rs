//! Proposal Store.
//!
//! Holds proposals and enforces their state machine. Every transition is a
//! check-and-set under the proposal's exclusive map entry, so at most one of
//! any set of concurrent transitions on the same proposal succeeds; the
//! losers observe the new state and get `InvalidTransition`.

mod error;
mod proposal;
mod query;

pub use error::*;
pub use proposal::*;
pub use query::ProposalQuery;

use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

type PendingKey = (String, ProposalKind);

/// Thread-safe proposal storage.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use phineas::proposals::{
///     DriverAssignment, Proposal, ProposalAction, ProposalStatus, ProposalStore,
/// };
///
/// let store = ProposalStore::new();
/// let action = ProposalAction::DriverAssignment(DriverAssignment {
///     booking_id: "bk-1".to_string(),
///     order_number: "ORD-1".to_string(),
///     customer_name: "Alex".to_string(),
///     delivery_address: "12 Main St".to_string(),
///     delivery_date: NaiveDate::from_ymd_opt(2030, 1, 10).unwrap(),
///     pickup_date: NaiveDate::from_ymd_opt(2030, 1, 12).unwrap(),
///     driver_id: "drv-1".to_string(),
///     driver_name: "Dana".to_string(),
///     score: 0.8,
///     distance: 1.2,
///     route_disruption: 0.4,
///     insertion_index: 0,
///     route_version: 0,
/// });
///
/// let created = store
///     .insert_pending(Proposal::new(action, "title", "description", "reasoning", 0.8))
///     .unwrap();
/// let approved = store.approve(created.id).unwrap();
/// assert_eq!(approved.status, ProposalStatus::Approved);
/// assert!(store.reject(created.id).is_err());
/// ```
pub struct ProposalStore {
    proposals: DashMap<Uuid, Proposal>,
    /// (booking, kind) -> the pending proposal for it
    pending_index: DashMap<PendingKey, Uuid>,
    sequence: AtomicU64,
}

impl Default for ProposalStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProposalStore {
    pub fn new() -> Self {
        Self {
            proposals: DashMap::new(),
            pending_index: DashMap::new(),
            sequence: AtomicU64::new(0),
        }
    }

    /// Store a new pending proposal.
    ///
    /// # Errors
    ///
    /// `DuplicatePending` if the booking already has a pending proposal of the
    /// same kind. The check and the insert are one atomic step.
    pub fn insert_pending(&self, mut proposal: Proposal) -> Result<Proposal, ProposalError> {
        let key = (proposal.booking_id.clone(), proposal.kind);

        // Lock order: index entry, then proposal shard.
        match self.pending_index.entry(key) {
            Entry::Occupied(existing) => Err(ProposalError::DuplicatePending {
                booking_id: proposal.booking_id,
                existing: *existing.get(),
            }),
            Entry::Vacant(slot) => {
                proposal.status = ProposalStatus::Pending;
                proposal.sequence = self.sequence.fetch_add(1, Ordering::SeqCst);
                self.proposals.insert(proposal.id, proposal.clone());
                slot.insert(proposal.id);
                Ok(proposal)
            }
        }
    }

    pub fn get(&self, id: Uuid) -> Option<Proposal> {
        self.proposals.get(&id).map(|entry| entry.value().clone())
    }

    /// The pending proposal for a booking, if any.
    pub fn pending_for(&self, booking_id: &str, kind: ProposalKind) -> Option<Uuid> {
        self.pending_index
            .get(&(booking_id.to_string(), kind))
            .map(|entry| *entry.value())
    }

    pub fn has_pending_for(&self, booking_id: &str, kind: ProposalKind) -> bool {
        self.pending_for(booking_id, kind).is_some()
    }

    /// pending -> approved
    pub fn approve(&self, id: Uuid) -> Result<Proposal, ProposalError> {
        self.transition(id, Transition::Approve, None, |_| {})
    }

    /// pending -> rejected
    pub fn reject(&self, id: Uuid) -> Result<Proposal, ProposalError> {
        self.transition(id, Transition::Reject, None, |_| {})
    }

    /// Apply `transition` atomically.
    ///
    /// With `expected_version`, the transition also fails with
    /// `VersionMismatch` if the proposal changed since it was read. `update`
    /// runs on the proposal after the status change, inside the same
    /// exclusive section.
    pub fn transition<F>(
        &self,
        id: Uuid,
        transition: Transition,
        expected_version: Option<u64>,
        update: F,
    ) -> Result<Proposal, ProposalError>
    where
        F: FnOnce(&mut Proposal),
    {
        let (updated, left_pending) = {
            let mut entry = self
                .proposals
                .get_mut(&id)
                .ok_or(ProposalError::NotFound(id))?;
            let proposal = entry.value_mut();

            let next = proposal
                .status
                .apply(transition)
                .ok_or(ProposalError::InvalidTransition {
                    proposal_id: id,
                    status: proposal.status,
                    transition,
                })?;

            if let Some(expected) = expected_version {
                if proposal.version != expected {
                    return Err(ProposalError::VersionMismatch {
                        proposal_id: id,
                        expected,
                        actual: proposal.version,
                    });
                }
            }

            let left_pending = proposal.status == ProposalStatus::Pending;
            let now = Utc::now();
            proposal.status = next;
            proposal.version += 1;
            proposal.updated_at = now;
            match next {
                ProposalStatus::Approved => proposal.approved_at = Some(now),
                ProposalStatus::Rejected => proposal.rejected_at = Some(now),
                ProposalStatus::Executed => proposal.executed_at = Some(now),
                ProposalStatus::Pending => {}
            }
            update(proposal);
            (proposal.clone(), left_pending)
        };

        // Proposal guard released above; index removal takes its own lock.
        if left_pending {
            let key = (updated.booking_id.clone(), updated.kind);
            self.pending_index.remove_if(&key, |_, pending| *pending == id);
        }

        Ok(updated)
    }

    /// Matching proposals, most recently created first.
    pub fn list(&self, query: &ProposalQuery) -> Vec<Proposal> {
        let mut proposals: Vec<Proposal> = self
            .proposals
            .iter()
            .filter(|entry| query.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        proposals.sort_by(|a, b| b.sequence.cmp(&a.sequence));
        proposals.truncate(query.limit);
        proposals
    }

    pub fn count_by_status(&self, status: ProposalStatus) -> usize {
        self.proposals
            .iter()
            .filter(|entry| entry.value().status == status)
            .count()
    }

    pub fn len(&self) -> usize {
        self.proposals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proposals.is_empty()
    }
}
