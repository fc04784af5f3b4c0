//! Booking endpoints.

use crate::api::{ApiError, AppState, BookingSummary, UnassignedBookingsResponse};
use crate::engine::RecommendationSet;
use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

/// GET /api/admin/drivers/unassigned-bookings
pub async fn unassigned(State(state): State<Arc<AppState>>) -> Json<UnassignedBookingsResponse> {
    let bookings: Vec<BookingSummary> = state
        .engine
        .list_unassigned_bookings()
        .into_iter()
        .map(BookingSummary::from)
        .collect();

    Json(UnassignedBookingsResponse {
        total: bookings.len(),
        bookings,
    })
}

/// GET /api/admin/drivers/recommendations/:booking_id
///
/// An empty `recommendations` list means no driver is eligible.
pub async fn recommendations(
    State(state): State<Arc<AppState>>,
    Path(booking_id): Path<String>,
) -> Result<Json<RecommendationSet>, ApiError> {
    let set = state.engine.driver_recommendations(&booking_id).await?;
    Ok(Json(set))
}
