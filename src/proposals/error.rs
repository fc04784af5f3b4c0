use super::{ProposalStatus, Transition};
use uuid::Uuid;

/// Errors that can occur during proposal store operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProposalError {
    #[error("proposal not found: {0}")]
    NotFound(Uuid),

    /// Carries the status observed when the transition was refused.
    #[error("cannot {transition} proposal {proposal_id}: proposal is {status}")]
    InvalidTransition {
        proposal_id: Uuid,
        status: ProposalStatus,
        transition: Transition,
    },

    #[error("proposal {proposal_id} changed (expected version {expected}, found {actual})")]
    VersionMismatch {
        proposal_id: Uuid,
        expected: u64,
        actual: u64,
    },

    #[error("booking {booking_id} already has pending proposal {existing}")]
    DuplicatePending { booking_id: String, existing: Uuid },

    #[error("Invalid value for '{field}': {message}")]
    Validation { field: String, message: String },
}
