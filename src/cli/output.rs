//! Output formatting helpers for CLI commands

use crate::api::BookingSummary;
use crate::engine::{RecommendationSet, ScanSummary};
use crate::fleet::BookingStatus;
use crate::proposals::ProposalStatus;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde::Serialize;
use serde_json::json;

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header);
    table
}

fn booking_status_cell(status: BookingStatus) -> String {
    let label = status.as_str();
    match status {
        BookingStatus::Confirmed | BookingStatus::Active => label.green().to_string(),
        BookingStatus::Pending | BookingStatus::PickupScheduled => label.yellow().to_string(),
        BookingStatus::OutForDelivery => label.cyan().to_string(),
        BookingStatus::Completed | BookingStatus::Cancelled => label.dimmed().to_string(),
    }
}

/// Proposal status with the same palette as the admin dashboard
pub fn proposal_status_cell(status: ProposalStatus) -> String {
    let label = status.to_string();
    match status {
        ProposalStatus::Pending => label.yellow().to_string(),
        ProposalStatus::Approved => label.cyan().to_string(),
        ProposalStatus::Executed => label.green().to_string(),
        ProposalStatus::Rejected => label.red().to_string(),
    }
}

fn score_cell(score: f64) -> String {
    let text = format!("{:.2}", score);
    if score >= 0.5 {
        text.green().to_string()
    } else if score >= 0.2 {
        text.yellow().to_string()
    } else {
        text.red().to_string()
    }
}

/// Format unassigned bookings as a table
pub fn format_bookings_table(bookings: &[BookingSummary]) -> String {
    if bookings.is_empty() {
        return "No unassigned bookings.".to_string();
    }

    let mut table = new_table(vec![
        "Booking", "Order", "Customer", "Delivery", "Date", "Window", "Status",
    ]);

    for b in bookings {
        table.add_row(vec![
            Cell::new(&b.booking_id),
            Cell::new(&b.order_number),
            Cell::new(&b.customer_name),
            Cell::new(&b.delivery_address),
            Cell::new(b.delivery_date),
            Cell::new(b.delivery_window.as_deref().unwrap_or("-")),
            Cell::new(booking_status_cell(b.status)),
        ]);
    }

    format!("{}\n{} unassigned", table, bookings.len())
}

/// Format ranked drivers for one booking as a table
pub fn format_recommendations_table(set: &RecommendationSet) -> String {
    let heading = format!(
        "{} · {} on {}",
        set.booking_id.bold(),
        set.delivery_address,
        set.delivery_date
    );

    if set.recommendations.is_empty() {
        return format!("{}\nNo eligible drivers.", heading);
    }

    let mut table = new_table(vec![
        "#", "Driver", "Score", "Distance", "Detour", "Stops", "Reason",
    ]);

    for (rank, r) in set.recommendations.iter().enumerate() {
        table.add_row(vec![
            Cell::new(rank + 1),
            Cell::new(format!("{} ({})", r.driver_name, r.driver_id)),
            Cell::new(score_cell(r.score)),
            Cell::new(format!("{:.1} mi", r.distance_to_delivery)),
            Cell::new(format!("{:.1} mi", r.route_disruption)),
            Cell::new(r.current_stops),
            Cell::new(&r.reason),
        ]);
    }

    format!("{}\n{}", heading, table)
}

/// Format the result of one scan as a table
pub fn format_scan_table(summary: &ScanSummary) -> String {
    let totals = format!(
        "Considered {} bookings: {} proposals created, {} already pending, {} without candidates, {} scoring failures",
        summary.bookings_considered,
        summary.proposals_created,
        summary.skipped_pending,
        summary.without_candidates,
        summary.scoring_failures
    );

    if summary.proposals.is_empty() {
        return totals;
    }

    let mut table = new_table(vec!["Proposal", "Booking", "Driver", "Confidence", "Status"]);
    for p in &summary.proposals {
        table.add_row(vec![
            Cell::new(p.id),
            Cell::new(&p.booking_id),
            Cell::new(p.driver_id.as_deref().unwrap_or("-")),
            Cell::new(score_cell(p.confidence_score)),
            Cell::new(proposal_status_cell(p.status)),
        ]);
    }

    format!("{}\n{}", table, totals)
}

/// Format unassigned bookings as JSON, in the shape the admin API returns
pub fn format_bookings_json(bookings: &[BookingSummary]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&json!({
        "total": bookings.len(),
        "bookings": bookings,
    }))
}

/// Pretty JSON for any serializable result
pub fn format_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}
