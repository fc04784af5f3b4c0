//! Assignment engine limits and timeouts

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Bounds applied to every engine operation.
///
/// # Example
///
/// ```toml
/// [engine]
/// scan_timeout_ms = 30000
/// scoring_timeout_ms = 10000
/// execute_timeout_ms = 10000
/// default_proposal_limit = 50
/// max_proposal_limit = 500
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Upper bound for a whole scan.
    ///
    /// Default: 30000 ms
    pub scan_timeout_ms: u64,

    /// Upper bound for scoring one booking, including address resolution.
    ///
    /// Default: 10000 ms
    pub scoring_timeout_ms: u64,

    /// Upper bound for executing one proposal.
    ///
    /// Default: 10000 ms
    pub execute_timeout_ms: u64,

    /// Result count when a proposal listing gives no limit.
    ///
    /// Default: 50
    pub default_proposal_limit: usize,

    /// Largest accepted listing limit; larger values are a validation error.
    ///
    /// Default: 500
    pub max_proposal_limit: usize,
}

impl EngineConfig {
    pub fn scan_timeout(&self) -> Duration {
        Duration::from_millis(self.scan_timeout_ms)
    }

    pub fn scoring_timeout(&self) -> Duration {
        Duration::from_millis(self.scoring_timeout_ms)
    }

    pub fn execute_timeout(&self) -> Duration {
        Duration::from_millis(self.execute_timeout_ms)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scan_timeout_ms: 30_000,
            scoring_timeout_ms: 10_000,
            execute_timeout_ms: 10_000,
            default_proposal_limit: 50,
            max_proposal_limit: 500,
        }
    }
}
