use crate::fleet::FleetError;
use crate::proposals::{ProposalError, ProposalStatus, Transition};
use crate::scoring::ScoringError;
use uuid::Uuid;

/// Errors surfaced by engine operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("Invalid value for '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("cannot {transition} proposal {proposal_id}: proposal is {status}")]
    InvalidTransition {
        proposal_id: Uuid,
        status: ProposalStatus,
        transition: Transition,
    },

    #[error("assignment conflict: {message}")]
    Conflict { message: String },

    #[error("scoring failed for booking {booking_id}: {message}")]
    UpstreamResolution { booking_id: String, message: String },

    #[error("{operation} timed out after {timeout_ms}ms")]
    Timeout {
        operation: &'static str,
        timeout_ms: u64,
    },

    #[error("internal error: {0}")]
    Internal(String),
}

impl EngineError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        EngineError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        EngineError::Conflict {
            message: message.into(),
        }
    }

    /// Timeouts may be retried by the caller; nothing else should be.
    pub fn is_retryable(&self) -> bool {
        matches!(self, EngineError::Timeout { .. })
    }
}

impl From<ProposalError> for EngineError {
    fn from(err: ProposalError) -> Self {
        match err {
            ProposalError::NotFound(id) => EngineError::NotFound {
                entity: "proposal",
                id: id.to_string(),
            },
            ProposalError::InvalidTransition {
                proposal_id,
                status,
                transition,
            } => EngineError::InvalidTransition {
                proposal_id,
                status,
                transition,
            },
            ProposalError::Validation { field, message } => {
                EngineError::Validation { field, message }
            }
            other @ (ProposalError::VersionMismatch { .. }
            | ProposalError::DuplicatePending { .. }) => EngineError::conflict(other.to_string()),
        }
    }
}

impl From<FleetError> for EngineError {
    fn from(err: FleetError) -> Self {
        match err {
            FleetError::BookingNotFound(id) => EngineError::NotFound {
                entity: "booking",
                id,
            },
            FleetError::DriverNotFound(id) => EngineError::NotFound {
                entity: "driver",
                id,
            },
            other @ (FleetError::AlreadyAssigned { .. }
            | FleetError::BookingClosed { .. }
            | FleetError::DriverInactive(_)
            | FleetError::RouteChanged { .. }
            | FleetError::DuplicateBooking(_)
            | FleetError::DuplicateDriver(_)) => EngineError::conflict(other.to_string()),
            other @ (FleetError::InvalidBooking { .. } | FleetError::InvalidDriver { .. }) => {
                EngineError::Internal(other.to_string())
            }
        }
    }
}

impl From<ScoringError> for EngineError {
    fn from(err: ScoringError) -> Self {
        EngineError::UpstreamResolution {
            booking_id: err.booking_id().to_string(),
            message: err.to_string(),
        }
    }
}
