//! Integration tests for the admin API.
//!
//! Requests go through the full router (middleware included) with
//! `tower::ServiceExt::oneshot`; no socket is opened.

mod common;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn send(app: &axum::Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| json!(String::from_utf8_lossy(&bytes)))
    };
    (status, value)
}

async fn scan_one(app: &axum::Router) -> String {
    let (status, body) = send(app, "POST", "/api/admin/phineas/scan-assignments", None).await;
    assert_eq!(status, StatusCode::OK);
    body["proposals"][0]["id"].as_str().unwrap().to_string()
}

fn assert_envelope(body: &Value, code: &str) {
    assert_eq!(body["error"]["code"], code, "body: {}", body);
    assert!(body["error"]["message"].is_string());
    assert!(body["error"]["type"].is_string());
}

#[tokio::test]
async fn test_health_reports_store_sizes() {
    let (app, _) = common::app_from(common::SCENARIO_A);
    let (status, body) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["bookings"], 1);
    assert_eq!(body["drivers"], 2);
    assert_eq!(body["geocoder"], "static");
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (app, _) = common::app_from(common::SCENARIO_A);
    let (status, _) = send(&app, "GET", "/api/admin/nothing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unassigned_bookings_listing() {
    let (app, _) = common::app_from(common::MIXED_FLEET);
    let (status, body) = send(&app, "GET", "/api/admin/drivers/unassigned-bookings", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);
    let ids: Vec<&str> = body["bookings"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["booking_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["bk-1", "bk-2", "bk-3"]);
    assert_eq!(body["bookings"][0]["assignment_status"], "unassigned");
}

#[tokio::test]
async fn test_stats_match_listing() {
    let (app, _) = common::app_from(common::MIXED_FLEET);
    let (_, listing) = send(&app, "GET", "/api/admin/drivers/unassigned-bookings", None).await;
    let (status, stats) = send(&app, "GET", "/api/admin/stats", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["unassigned_bookings"], listing["total"]);
    assert_eq!(stats["total_bookings"], 5);
    assert_eq!(stats["active_drivers"], 1);
    assert_eq!(stats["pending_proposals"], 0);
}

#[tokio::test]
async fn test_recommendations_rank_d2_first() {
    let (app, _) = common::app_from(common::SCENARIO_A);
    let (status, body) = send(&app, "GET", "/api/admin/drivers/recommendations/bk-1", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["booking_id"], "bk-1");
    let recs = body["recommendations"].as_array().unwrap();
    assert_eq!(recs.len(), 2);
    assert_eq!(recs[0]["driver_id"], "d2");
    assert_eq!(recs[1]["driver_id"], "d1");
    assert!(recs[0]["score"].as_f64().unwrap() > recs[1]["score"].as_f64().unwrap());
}

#[tokio::test]
async fn test_recommendations_error_statuses() {
    let (app, _) = common::app_from(common::SCENARIO_A);

    let (status, body) = send(&app, "GET", "/api/admin/drivers/recommendations/bk-404", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_envelope(&body, "not_found");
    assert_eq!(body["error"]["param"], "booking_id");

    let long_id = "b".repeat(65);
    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/admin/drivers/recommendations/{}", long_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_envelope(&body, "invalid_request_error");
}

#[tokio::test]
async fn test_full_review_flow_over_http() {
    let (app, engine) = common::app_from(common::SCENARIO_A);
    let id = scan_one(&app).await;

    let (status, body) = send(&app, "GET", &format!("/api/admin/phineas/proposals/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "pending");
    assert_eq!(body["proposal_type"], "driver_assignment");
    assert_eq!(body["title"], "Assign D2 to delivery for ORD-1");

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/api/admin/phineas/proposals/{}/approve", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "approved");

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/admin/phineas/proposals/{}/execute", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        "Successfully assigned D2 to delivery for booking ORD-1"
    );
    assert_eq!(body["proposal"]["status"], "executed");
    assert_eq!(body["proposal"]["execution_result"]["driver_id"], "d2");

    let booking = engine.fleet().get_booking("bk-1").unwrap();
    assert_eq!(booking.assigned_driver_id.as_deref(), Some("d2"));

    // Executed is terminal.
    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/api/admin/phineas/proposals/{}/reject", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_envelope(&body, "invalid_transition");

    let (_, stats) = send(&app, "GET", "/api/admin/stats", None).await;
    assert_eq!(stats["unassigned_bookings"], 0);
}

#[tokio::test]
async fn test_execute_pending_proposal_is_conflict() {
    let (app, engine) = common::app_from(common::SCENARIO_A);
    let id = scan_one(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/admin/phineas/proposals/{}/execute", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_envelope(&body, "invalid_transition");
    assert!(engine.fleet().get_booking("bk-1").unwrap().is_unassigned());
}

#[tokio::test]
async fn test_execute_assignment_body() {
    let (app, _) = common::app_from(common::SCENARIO_A);
    let id = scan_one(&app).await;
    send(
        &app,
        "PATCH",
        &format!("/api/admin/phineas/proposals/{}/approve", id),
        None,
    )
    .await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/admin/phineas/execute-assignment",
        Some(json!({ "proposal_id": id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["proposal"]["status"], "executed");

    let (status, body) = send(
        &app,
        "POST",
        "/api/admin/phineas/execute-assignment",
        Some(json!({ "proposal": id })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["param"], "proposal_id");
}

#[tokio::test]
async fn test_proposal_id_validation() {
    let (app, _) = common::app_from(common::SCENARIO_A);

    let (status, body) = send(&app, "PATCH", "/api/admin/phineas/proposals/not-a-uuid/approve", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["param"], "proposal_id");

    let missing = uuid::Uuid::new_v4();
    let (status, body) = send(&app, "GET", &format!("/api/admin/phineas/proposals/{}", missing), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_envelope(&body, "not_found");
}

#[tokio::test]
async fn test_proposal_listing_filters_and_aliases() {
    let (app, _) = common::app_from(common::MIXED_FLEET);
    let (_, summary) = send(&app, "POST", "/api/admin/phineas/scan-assignments", None).await;
    assert_eq!(summary["proposals_created"], 3);

    let first = summary["proposals"][0]["id"].as_str().unwrap().to_string();
    send(
        &app,
        "PATCH",
        &format!("/api/admin/phineas/proposals/{}/reject", first),
        None,
    )
    .await;

    let (status, body) = send(&app, "GET", "/api/admin/phineas/proposals?status=pending", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (_, body) = send(&app, "GET", "/api/admin/phineas/proposals?status_filter=rejected", None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["id"], first.as_str());

    let (_, body) = send(
        &app,
        "GET",
        "/api/admin/phineas/proposals?proposal_type=driver_assignment&limit=1",
        None,
    )
    .await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = send(&app, "GET", "/api/admin/phineas/proposals?status=done", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["param"], "status");

    let (status, _) = send(&app, "GET", "/api/admin/phineas/proposals?limit=many", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_scan_twice_creates_no_duplicates() {
    let (app, engine) = common::app_from(common::SCENARIO_A);
    scan_one(&app).await;

    let (status, body) = send(&app, "POST", "/api/admin/phineas/scan-assignments", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["proposals_created"], 0);
    assert_eq!(body["skipped_pending"], 1);
    assert_eq!(engine.proposals().len(), 1);
}

#[tokio::test]
async fn test_request_id_header_is_accepted() {
    let (app, _) = common::app_from(common::SCENARIO_A);
    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "req-123")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_metrics_endpoint_renders_text() {
    let (app, _) = common::app_from(common::SCENARIO_A);
    let response = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/plain"));
}
