//! Health check endpoint handler.

use crate::api::AppState;
use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_seconds: u64,
    pub bookings: usize,
    pub drivers: usize,
    pub proposals: usize,
    pub geocoder: String,
}

/// GET /health - Return service status and store sizes.
pub async fn handle(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let engine = &state.engine;
    Json(HealthResponse {
        status: "healthy".to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        bookings: engine.fleet().booking_count(),
        drivers: engine.fleet().driver_count(),
        proposals: engine.proposals().len(),
        geocoder: engine.scorer().geocoder().name().to_string(),
    })
}
