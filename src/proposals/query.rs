//! Proposal listing filters

use super::{Proposal, ProposalError, ProposalKind, ProposalStatus};

/// Filters for [`ProposalStore::list`](super::ProposalStore::list).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposalQuery {
    pub status: Option<ProposalStatus>,
    pub kind: Option<ProposalKind>,
    pub limit: usize,
}

impl ProposalQuery {
    /// Every proposal, up to `limit`.
    pub fn all(limit: usize) -> Self {
        Self {
            status: None,
            kind: None,
            limit,
        }
    }

    pub fn with_status(mut self, status: ProposalStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Validate raw listing parameters.
    ///
    /// Empty strings and `"all"` mean no filter. A missing limit uses
    /// `default_limit`; a limit outside `1..=max_limit` is rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use phineas::proposals::{ProposalQuery, ProposalStatus};
    ///
    /// let q = ProposalQuery::parse(Some("pending"), None, None, 50, 500).unwrap();
    /// assert_eq!(q.status, Some(ProposalStatus::Pending));
    /// assert_eq!(q.limit, 50);
    ///
    /// assert!(ProposalQuery::parse(None, None, Some(0), 50, 500).is_err());
    /// ```
    pub fn parse(
        status: Option<&str>,
        kind: Option<&str>,
        limit: Option<usize>,
        default_limit: usize,
        max_limit: usize,
    ) -> Result<Self, ProposalError> {
        let status = match normalize(status) {
            Some(s) => Some(s.parse().map_err(|message| ProposalError::Validation {
                field: "status".to_string(),
                message,
            })?),
            None => None,
        };

        let kind = match normalize(kind) {
            Some(k) => Some(k.parse().map_err(|message| ProposalError::Validation {
                field: "type".to_string(),
                message,
            })?),
            None => None,
        };

        let limit = limit.unwrap_or(default_limit);
        if limit == 0 || limit > max_limit {
            return Err(ProposalError::Validation {
                field: "limit".to_string(),
                message: format!("must be between 1 and {}, got {}", max_limit, limit),
            });
        }

        Ok(Self {
            status,
            kind,
            limit,
        })
    }

    pub fn matches(&self, proposal: &Proposal) -> bool {
        self.status.is_none_or(|s| proposal.status == s) && self.kind.is_none_or(|k| proposal.kind == k)
    }
}

fn normalize(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let q = ProposalQuery::parse(None, None, None, 50, 500).unwrap();
        assert_eq!(q, ProposalQuery::all(50));
    }

    #[test]
    fn test_parse_filters() {
        let q = ProposalQuery::parse(Some("Approved"), Some("driver_assignment"), Some(10), 50, 500)
            .unwrap();
        assert_eq!(q.status, Some(ProposalStatus::Approved));
        assert_eq!(q.kind, Some(ProposalKind::DriverAssignment));
        assert_eq!(q.limit, 10);
    }

    #[test]
    fn test_parse_all_and_empty_mean_unfiltered() {
        let q = ProposalQuery::parse(Some("all"), Some(""), None, 50, 500).unwrap();
        assert!(q.status.is_none());
        assert!(q.kind.is_none());
    }

    #[test]
    fn test_parse_rejects_unknown_status() {
        let err = ProposalQuery::parse(Some("done"), None, None, 50, 500).unwrap_err();
        assert!(matches!(err, ProposalError::Validation { ref field, .. } if field == "status"));
    }

    #[test]
    fn test_parse_rejects_unknown_type() {
        let err = ProposalQuery::parse(None, Some("refund"), None, 50, 500).unwrap_err();
        assert!(matches!(err, ProposalError::Validation { ref field, .. } if field == "type"));
    }

    #[test]
    fn test_parse_rejects_out_of_range_limit() {
        for limit in [0, 501] {
            let err = ProposalQuery::parse(None, None, Some(limit), 50, 500).unwrap_err();
            assert!(matches!(err, ProposalError::Validation { ref field, .. } if field == "limit"));
        }
        assert!(ProposalQuery::parse(None, None, Some(500), 50, 500).is_ok());
    }
}
