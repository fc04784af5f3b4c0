//! Proposal entity and its state machine

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Lifecycle status of a proposal.
///
/// ```text
/// pending  --approve-->  approved
/// pending  --reject-->   rejected   (terminal)
/// approved --execute-->  executed   (terminal)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    Pending,
    Approved,
    Rejected,
    Executed,
}

/// An admin action on a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    Approve,
    Reject,
    Execute,
}

impl ProposalStatus {
    pub const ALL: [ProposalStatus; 4] = [
        ProposalStatus::Pending,
        ProposalStatus::Approved,
        ProposalStatus::Rejected,
        ProposalStatus::Executed,
    ];

    /// The state reached by `transition`, or `None` if it is not allowed.
    pub fn apply(self, transition: Transition) -> Option<ProposalStatus> {
        match (self, transition) {
            (ProposalStatus::Pending, Transition::Approve) => Some(ProposalStatus::Approved),
            (ProposalStatus::Pending, Transition::Reject) => Some(ProposalStatus::Rejected),
            (ProposalStatus::Approved, Transition::Execute) => Some(ProposalStatus::Executed),
            _ => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ProposalStatus::Rejected | ProposalStatus::Executed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProposalStatus::Pending => "pending",
            ProposalStatus::Approved => "approved",
            ProposalStatus::Rejected => "rejected",
            ProposalStatus::Executed => "executed",
        }
    }
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProposalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(ProposalStatus::Pending),
            "approved" => Ok(ProposalStatus::Approved),
            "rejected" => Ok(ProposalStatus::Rejected),
            "executed" => Ok(ProposalStatus::Executed),
            _ => Err(format!("Invalid proposal status: {}", s)),
        }
    }
}

impl Transition {
    pub const ALL: [Transition; 3] = [Transition::Approve, Transition::Reject, Transition::Execute];

    pub fn as_str(&self) -> &'static str {
        match self {
            Transition::Approve => "approve",
            Transition::Reject => "reject",
            Transition::Execute => "execute",
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kinds of action a proposal can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalKind {
    DriverAssignment,
}

impl ProposalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProposalKind::DriverAssignment => "driver_assignment",
        }
    }
}

impl fmt::Display for ProposalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProposalKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "driver_assignment" => Ok(ProposalKind::DriverAssignment),
            _ => Err(format!("Invalid proposal type: {}", s)),
        }
    }
}

/// Snapshot of the top recommendation when a driver assignment was proposed.
///
/// Never re-scored after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverAssignment {
    pub booking_id: String,
    pub order_number: String,
    pub customer_name: String,
    pub delivery_address: String,
    pub delivery_date: NaiveDate,
    pub pickup_date: NaiveDate,
    pub driver_id: String,
    pub driver_name: String,
    pub score: f64,
    pub distance: f64,
    pub route_disruption: f64,
    pub insertion_index: usize,
    pub route_version: u64,
}

/// What executing a proposal does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProposalAction {
    DriverAssignment(DriverAssignment),
}

impl ProposalAction {
    pub fn kind(&self) -> ProposalKind {
        match self {
            ProposalAction::DriverAssignment(_) => ProposalKind::DriverAssignment,
        }
    }

    pub fn booking_id(&self) -> &str {
        match self {
            ProposalAction::DriverAssignment(a) => &a.booking_id,
        }
    }

    pub fn driver_id(&self) -> Option<&str> {
        match self {
            ProposalAction::DriverAssignment(a) => Some(&a.driver_id),
        }
    }
}

/// A reviewable suggestion to act on a booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: Uuid,
    #[serde(rename = "proposal_type")]
    pub kind: ProposalKind,
    pub status: ProposalStatus,
    pub title: String,
    pub description: String,
    pub reasoning: String,
    /// In [0, 1]
    pub confidence_score: f64,
    pub action_data: ProposalAction,
    pub booking_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_result: Option<serde_json::Value>,
    /// Incremented on every transition
    pub version: u64,
    /// Creation order within the store
    #[serde(skip)]
    pub sequence: u64,
}

impl Proposal {
    /// A new pending proposal. Confidence is clamped into [0, 1].
    pub fn new(
        action: ProposalAction,
        title: impl Into<String>,
        description: impl Into<String>,
        reasoning: impl Into<String>,
        confidence_score: f64,
    ) -> Self {
        let now = Utc::now();
        let confidence_score = if confidence_score.is_finite() {
            confidence_score.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            id: Uuid::new_v4(),
            kind: action.kind(),
            status: ProposalStatus::Pending,
            title: title.into(),
            description: description.into(),
            reasoning: reasoning.into(),
            confidence_score,
            booking_id: action.booking_id().to_string(),
            driver_id: action.driver_id().map(str::to_string),
            action_data: action,
            created_at: now,
            updated_at: now,
            approved_at: None,
            rejected_at: None,
            executed_at: None,
            execution_result: None,
            version: 0,
            sequence: 0,
        }
    }
}
