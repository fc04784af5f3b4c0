//! # Metrics Collection Module
//!
//! Prometheus export of engine activity.
//!
//! ## Metrics Tracked
//!
//! **Counters:**
//! - `phineas_scans_total` - Assignment scans started
//! - `phineas_proposals_created_total` - Proposals created by scans
//! - `phineas_transitions_total{transition, outcome}` - Approve/reject/execute attempts
//! - `phineas_scoring_failures_total` - Bookings whose scoring failed or timed out
//!
//! **Histograms:**
//! - `phineas_scan_duration_seconds` - Wall time of a scan
//!
//! **Gauges** (refreshed on every scrape):
//! - `phineas_unassigned_bookings`
//! - `phineas_pending_proposals`
//! - `phineas_active_drivers`

pub mod handler;

// Re-export PrometheusBuilder for test compatibility
pub use metrics_exporter_prometheus::PrometheusBuilder;

use crate::engine::AssignmentEngine;
use std::sync::Arc;
use std::time::Instant;

/// Gauge refresh and rendering for the `/metrics` endpoint.
pub struct MetricsCollector {
    engine: Arc<AssignmentEngine>,
    /// Startup time for uptime calculation
    start_time: Instant,
    prometheus_handle: metrics_exporter_prometheus::PrometheusHandle,
}

impl MetricsCollector {
    pub fn new(
        engine: Arc<AssignmentEngine>,
        start_time: Instant,
        prometheus_handle: metrics_exporter_prometheus::PrometheusHandle,
    ) -> Self {
        Self {
            engine,
            start_time,
            prometheus_handle,
        }
    }

    /// Set the state gauges from the current engine statistics.
    pub fn update_gauges(&self) {
        let stats = self.engine.admin_stats();
        metrics::gauge!("phineas_unassigned_bookings").set(stats.unassigned_bookings as f64);
        metrics::gauge!("phineas_pending_proposals").set(stats.pending_proposals as f64);
        metrics::gauge!("phineas_active_drivers").set(stats.active_drivers as f64);
    }

    /// Get uptime in seconds since startup.
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Render Prometheus metrics in text format.
    pub fn render_metrics(&self) -> String {
        self.prometheus_handle.render()
    }
}

/// Install the Prometheus recorder.
///
/// Scan durations use buckets from 10ms to 60s.
pub fn setup_metrics(
) -> Result<metrics_exporter_prometheus::PrometheusHandle, Box<dyn std::error::Error>> {
    use metrics_exporter_prometheus::Matcher;

    let scan_buckets = &[0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0];

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("phineas_scan_duration_seconds".to_string()),
            scan_buckets,
        )?
        .install_recorder()?;

    Ok(handle)
}

/// Install the recorder, or build a detached handle if one is already
/// installed (several servers in one test process).
pub fn setup_metrics_or_detached() -> metrics_exporter_prometheus::PrometheusHandle {
    setup_metrics().unwrap_or_else(|e| {
        tracing::debug!("Metrics already initialized, creating new handle: {}", e);
        PrometheusBuilder::new().build_recorder().handle()
    })
}
