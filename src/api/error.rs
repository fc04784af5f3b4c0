//! API error envelope
//!
//! Every error response has the shape:
//! ```json
//! {
//!   "error": {
//!     "message": "cannot reject proposal ...: proposal is executed",
//!     "type": "invalid_request_error",
//!     "param": "proposal_id",
//!     "code": "invalid_transition"
//!   }
//! }
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};

use crate::engine::EngineError;

/// API error response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiError {
    pub error: ApiErrorBody,
}

/// Error details.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiErrorBody {
    pub message: String,
    pub r#type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ApiError {
    fn new(message: impl Into<String>, r#type: &str, param: Option<&str>, code: &str) -> Self {
        Self {
            error: ApiErrorBody {
                message: message.into(),
                r#type: r#type.to_string(),
                param: param.map(str::to_string),
                code: Some(code.to_string()),
            },
        }
    }

    /// Create a bad request error (400).
    pub fn bad_request(message: &str) -> Self {
        Self::new(message, "invalid_request_error", None, "invalid_request_error")
    }

    /// Create a bad request error naming the offending parameter (400).
    pub fn invalid_param(param: &str, message: &str) -> Self {
        Self::new(message, "invalid_request_error", Some(param), "invalid_request_error")
    }

    /// Create a not found error (404).
    pub fn not_found(message: &str) -> Self {
        Self::new(message, "invalid_request_error", None, "not_found")
    }

    /// Get the HTTP status code for this error.
    fn status_code(&self) -> StatusCode {
        match self.error.code.as_deref() {
            Some("invalid_request_error") => StatusCode::BAD_REQUEST,
            Some("not_found") => StatusCode::NOT_FOUND,
            Some("invalid_transition") | Some("assignment_conflict") => StatusCode::CONFLICT,
            Some("scoring_failed") => StatusCode::BAD_GATEWAY,
            Some("timeout") => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        let message = err.to_string();
        match err {
            EngineError::Validation { field, .. } => Self::new(
                message,
                "invalid_request_error",
                Some(&field),
                "invalid_request_error",
            ),
            EngineError::NotFound { entity, .. } => {
                let param = format!("{}_id", entity);
                Self::new(message, "invalid_request_error", Some(&param), "not_found")
            }
            EngineError::InvalidTransition { .. } => Self::new(
                message,
                "invalid_request_error",
                Some("proposal_id"),
                "invalid_transition",
            ),
            EngineError::Conflict { .. } => {
                Self::new(message, "conflict_error", None, "assignment_conflict")
            }
            EngineError::UpstreamResolution { .. } => {
                Self::new(message, "server_error", None, "scoring_failed")
            }
            EngineError::Timeout { .. } => Self::new(message, "server_error", None, "timeout"),
            EngineError::Internal(_) => Self::new(message, "server_error", None, "internal_error"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::warn!(status = %status, message = %self.error.message, "Request failed");
        }
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proposals::{ProposalStatus, Transition};
    use uuid::Uuid;

    fn status_of(err: EngineError) -> StatusCode {
        ApiError::from(err).into_response().status()
    }

    #[test]
    fn test_engine_error_status_mapping() {
        assert_eq!(
            status_of(EngineError::validation("limit", "too big")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(EngineError::NotFound {
                entity: "booking",
                id: "bk-1".to_string()
            }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(EngineError::InvalidTransition {
                proposal_id: Uuid::new_v4(),
                status: ProposalStatus::Executed,
                transition: Transition::Reject,
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(status_of(EngineError::conflict("taken")), StatusCode::CONFLICT);
        assert_eq!(
            status_of(EngineError::UpstreamResolution {
                booking_id: "bk-1".to_string(),
                message: "no geocode".to_string()
            }),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(EngineError::Timeout {
                operation: "scan",
                timeout_ms: 5
            }),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            status_of(EngineError::Internal("boom".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_validation_envelope_names_param() {
        let json =
            serde_json::to_value(ApiError::from(EngineError::validation("status", "bad"))).unwrap();
        assert_eq!(json["error"]["type"], "invalid_request_error");
        assert_eq!(json["error"]["param"], "status");
        assert_eq!(json["error"]["code"], "invalid_request_error");
    }

    #[test]
    fn test_not_found_param_from_entity() {
        let json = serde_json::to_value(ApiError::from(EngineError::NotFound {
            entity: "proposal",
            id: "x".to_string(),
        }))
        .unwrap();
        assert_eq!(json["error"]["param"], "proposal_id");
        assert_eq!(json["error"]["code"], "not_found");
    }

    #[test]
    fn test_optional_fields_omitted() {
        let error = ApiError {
            error: ApiErrorBody {
                message: "Unknown".to_string(),
                r#type: "server_error".to_string(),
                param: None,
                code: None,
            },
        };
        let json = serde_json::to_value(&error).unwrap();
        assert!(json["error"].get("param").is_none());
        assert_eq!(error.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
