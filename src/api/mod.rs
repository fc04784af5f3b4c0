//! # Admin API
//!
//! HTTP+JSON binding of the assignment engine.
//!
//! ## Endpoints
//!
//! - `GET /api/admin/drivers/unassigned-bookings` - Open bookings without a driver
//! - `GET /api/admin/drivers/recommendations/:booking_id` - Ranked drivers for a booking
//! - `GET /api/admin/phineas/proposals` - Proposal listing (`status`, `type`, `limit`)
//! - `GET /api/admin/phineas/proposals/:proposal_id` - One proposal
//! - `POST /api/admin/phineas/scan-assignments` - Create proposals for open bookings
//! - `PATCH /api/admin/phineas/proposals/:proposal_id/approve`
//! - `PATCH /api/admin/phineas/proposals/:proposal_id/reject`
//! - `POST /api/admin/phineas/proposals/:proposal_id/execute`
//! - `POST /api/admin/phineas/execute-assignment` - Execute, id in the body
//! - `GET /api/admin/stats` - Dashboard counters
//! - `GET /health`, `GET /metrics`
//!
//! ## Example
//!
//! ```no_run
//! use phineas::api::{create_router, AppState};
//! use phineas::config::PhineasConfig;
//! use phineas::engine::{AssignmentEngine, SystemClock};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Arc::new(PhineasConfig::default());
//! let engine = Arc::new(AssignmentEngine::from_config(&config, Arc::new(SystemClock))?);
//! let state = Arc::new(AppState::new(engine, config));
//!
//! let app = create_router(state);
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! Errors use the envelope described in [`ApiError`].

mod bookings;
pub mod error;
mod health;
mod proposals;
mod stats;
pub mod types;

pub use error::{ApiError, ApiErrorBody};
pub use types::*;

use crate::config::PhineasConfig;
use crate::engine::AssignmentEngine;
use crate::metrics::MetricsCollector;
use axum::{
    body::Body,
    http::{HeaderValue, Method},
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

/// Shared application state accessible to all handlers.
pub struct AppState {
    pub engine: Arc<AssignmentEngine>,
    pub config: Arc<PhineasConfig>,
    /// Server startup time for uptime tracking
    pub start_time: Instant,
    pub metrics_collector: Arc<MetricsCollector>,
}

impl AppState {
    pub fn new(engine: Arc<AssignmentEngine>, config: Arc<PhineasConfig>) -> Self {
        let start_time = Instant::now();

        // Safe to call more than once; later calls get a detached handle.
        let prometheus_handle = crate::metrics::setup_metrics_or_detached();
        let metrics_collector = Arc::new(MetricsCollector::new(
            Arc::clone(&engine),
            start_time,
            prometheus_handle,
        ));

        Self {
            engine,
            config,
            start_time,
            metrics_collector,
        }
    }
}

/// Create the main API router with all endpoints configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    let server = &state.config.server;

    let mut router = Router::new()
        .route(
            "/api/admin/drivers/unassigned-bookings",
            get(bookings::unassigned),
        )
        .route(
            "/api/admin/drivers/recommendations/:booking_id",
            get(bookings::recommendations),
        )
        .route("/api/admin/phineas/proposals", get(proposals::list))
        .route("/api/admin/phineas/proposals/:proposal_id", get(proposals::get))
        .route(
            "/api/admin/phineas/proposals/:proposal_id/approve",
            patch(proposals::approve),
        )
        .route(
            "/api/admin/phineas/proposals/:proposal_id/reject",
            patch(proposals::reject),
        )
        .route(
            "/api/admin/phineas/proposals/:proposal_id/execute",
            post(proposals::execute),
        )
        .route(
            "/api/admin/phineas/execute-assignment",
            post(proposals::execute_assignment),
        )
        .route(
            "/api/admin/phineas/scan-assignments",
            post(proposals::scan),
        )
        .route("/api/admin/stats", get(stats::handle))
        .route("/health", get(health::handle))
        .route("/metrics", get(crate::metrics::handler::metrics_handler))
        .layer(RequestBodyLimitLayer::new(server.max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            server.request_timeout_seconds,
        )));

    if let Some(cors) = cors_layer(&server.cors_origins) {
        router = router.layer(cors);
    }

    router
        .layer(TraceLayer::new_for_http().make_span_with(crate::logging::make_request_span::<Body>))
        .with_state(state)
}

/// CORS for the configured origins; `None` when no origins are configured.
fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if allowed.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(allowed)
            .allow_methods([Method::GET, Method::POST, Method::PATCH])
            .allow_headers(Any),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_layer_skips_invalid_origins() {
        assert!(cors_layer(&[]).is_none());
        assert!(cors_layer(&["bad\norigin".to_string()]).is_none());
        assert!(cors_layer(&["http://localhost:5173".to_string()]).is_some());
    }
}
