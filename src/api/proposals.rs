//! Proposal review endpoints.

use crate::api::{ApiError, AppState, ExecuteAssignmentRequest, ProposalListParams};
use crate::engine::{ExecutionOutcome, ScanSummary};
use crate::proposals::Proposal;
use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Path, Query, State},
    Json,
};
use std::sync::Arc;

/// GET /api/admin/phineas/proposals
pub async fn list(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ProposalListParams>, QueryRejection>,
) -> Result<Json<Vec<Proposal>>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::bad_request(&e.body_text()))?;
    let proposals = state
        .engine
        .list_proposals(params.status(), params.kind(), params.limit)?;
    Ok(Json(proposals))
}

/// GET /api/admin/phineas/proposals/:proposal_id
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(proposal_id): Path<String>,
) -> Result<Json<Proposal>, ApiError> {
    Ok(Json(state.engine.get_proposal(&proposal_id)?))
}

/// POST /api/admin/phineas/scan-assignments
pub async fn scan(State(state): State<Arc<AppState>>) -> Result<Json<ScanSummary>, ApiError> {
    Ok(Json(state.engine.scan_assignments().await?))
}

/// PATCH /api/admin/phineas/proposals/:proposal_id/approve
pub async fn approve(
    State(state): State<Arc<AppState>>,
    Path(proposal_id): Path<String>,
) -> Result<Json<Proposal>, ApiError> {
    Ok(Json(state.engine.approve_proposal(&proposal_id)?))
}

/// PATCH /api/admin/phineas/proposals/:proposal_id/reject
pub async fn reject(
    State(state): State<Arc<AppState>>,
    Path(proposal_id): Path<String>,
) -> Result<Json<Proposal>, ApiError> {
    Ok(Json(state.engine.reject_proposal(&proposal_id)?))
}

/// POST /api/admin/phineas/proposals/:proposal_id/execute
pub async fn execute(
    State(state): State<Arc<AppState>>,
    Path(proposal_id): Path<String>,
) -> Result<Json<ExecutionOutcome>, ApiError> {
    Ok(Json(state.engine.execute_proposal(&proposal_id).await?))
}

/// POST /api/admin/phineas/execute-assignment with `{"proposal_id": "..."}`
pub async fn execute_assignment(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ExecuteAssignmentRequest>, JsonRejection>,
) -> Result<Json<ExecutionOutcome>, ApiError> {
    let Json(request) = body.map_err(|e| ApiError::invalid_param("proposal_id", &e.body_text()))?;
    Ok(Json(state.engine.execute_proposal(&request.proposal_id).await?))
}
