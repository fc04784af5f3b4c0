//! Admin statistics endpoint.

use crate::api::AppState;
use crate::engine::AdminStats;
use axum::{extract::State, Json};
use std::sync::Arc;

/// GET /api/admin/stats
pub async fn handle(State(state): State<Arc<AppState>>) -> Json<AdminStats> {
    Json(state.engine.admin_stats())
}
