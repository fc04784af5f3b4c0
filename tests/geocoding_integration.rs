//! Geocoding provider contracts, exercised through `build_geocoder` and the
//! engine against wiremock servers.

mod common;

use chrono::NaiveDate;
use phineas::config::{GeocodingConfig, GeocodingProvider, PhineasConfig};
use phineas::engine::{AssignmentEngine, EngineError, FixedClock};
use phineas::geo::{build_geocoder, Coordinates, GeocodeError, Geocoder};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn nominatim_config(server: &MockServer) -> GeocodingConfig {
    GeocodingConfig {
        provider: GeocodingProvider::Nominatim,
        base_url: Some(server.uri()),
        user_agent: "phineas-tests".to_string(),
        ..GeocodingConfig::default()
    }
}

#[tokio::test]
async fn test_nominatim_contract_and_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "12 Main St"))
        .and(query_param("format", "json"))
        .and(header("user-agent", "phineas-tests"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{ "lat": "39.78", "lon": "-89.65" }])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let geocoder = build_geocoder(&nominatim_config(&server)).unwrap();
    let first = geocoder.geocode("12 Main St").await.unwrap();
    let second = geocoder.geocode("12 main st").await.unwrap();

    assert_eq!(first, Coordinates::new(39.78, -89.65));
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_nominatim_empty_result_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(2)
        .mount(&server)
        .await;

    let geocoder = build_geocoder(&nominatim_config(&server)).unwrap();
    assert!(matches!(
        geocoder.geocode("Nowhere").await,
        Err(GeocodeError::NotFound(_))
    ));
    // Failures are retried, not cached.
    assert!(geocoder.geocode("Nowhere").await.is_err());
}

#[tokio::test]
async fn test_configured_addresses_never_reach_provider() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = nominatim_config(&server);
    config
        .addresses
        .insert("100 Warehouse Way".to_string(), Coordinates::new(39.7, -89.6));

    let geocoder = build_geocoder(&config).unwrap();
    assert_eq!(
        geocoder.geocode("100 warehouse way").await.unwrap(),
        Coordinates::new(39.7, -89.6)
    );
    assert_eq!(
        geocoder.geocode("39.8, -89.7").await.unwrap(),
        Coordinates::new(39.8, -89.7)
    );
}

#[tokio::test]
async fn test_google_contract() {
    std::env::set_var("PHINEAS_TEST_GOOGLE_KEY", "secret-key");

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/maps/api/geocode/json"))
        .and(query_param("address", "48 Lakeshore Dr"))
        .and(query_param("key", "secret-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "results": [{ "geometry": { "location": { "lat": 39.76, "lng": -89.62 } } }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/maps/api/geocode/json"))
        .and(query_param("address", "Denied"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid."
        })))
        .mount(&server)
        .await;

    let config = GeocodingConfig {
        provider: GeocodingProvider::Google,
        base_url: Some(server.uri()),
        api_key_env: "PHINEAS_TEST_GOOGLE_KEY".to_string(),
        ..GeocodingConfig::default()
    };
    let geocoder = build_geocoder(&config).unwrap();

    assert_eq!(
        geocoder.geocode("48 Lakeshore Dr").await.unwrap(),
        Coordinates::new(39.76, -89.62)
    );
    match geocoder.geocode("Denied").await {
        Err(GeocodeError::Upstream { message, .. }) => assert!(message.contains("invalid")),
        other => panic!("expected upstream error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_google_without_key_is_configuration_error() {
    let config = GeocodingConfig {
        provider: GeocodingProvider::Google,
        api_key_env: "PHINEAS_TEST_UNSET_KEY".to_string(),
        ..GeocodingConfig::default()
    };
    assert!(matches!(
        build_geocoder(&config),
        Err(GeocodeError::Configuration(_))
    ));
}

#[tokio::test]
async fn test_provider_outage_surfaces_as_scoring_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let mut config: PhineasConfig = toml::from_str(common::SCENARIO_A).unwrap();
    config.geocoding = nominatim_config(&server);
    config.bookings[0].delivery_address = "12 Main St".to_string();

    let clock = FixedClock::on(NaiveDate::from_ymd_opt(2030, 7, 1).unwrap());
    let engine = AssignmentEngine::from_config(&config, Arc::new(clock)).unwrap();

    let err = engine.driver_recommendations("bk-1").await.unwrap_err();
    assert!(matches!(err, EngineError::UpstreamResolution { .. }));

    let summary = engine.scan_assignments().await.unwrap();
    assert_eq!(summary.scoring_failures, 1);
    assert_eq!(summary.proposals_created, 0);
}

#[tokio::test]
async fn test_recommendations_with_geocoded_booking() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "12 Main St"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{ "lat": "0.029", "lon": "0" }])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut config: PhineasConfig = toml::from_str(common::SCENARIO_A).unwrap();
    config.geocoding = nominatim_config(&server);
    config.bookings[0].delivery_address = "12 Main St".to_string();

    let clock = FixedClock::on(NaiveDate::from_ymd_opt(2030, 7, 1).unwrap());
    let engine = AssignmentEngine::from_config(&config, Arc::new(clock)).unwrap();

    let first = engine.driver_recommendations("bk-1").await.unwrap();
    let second = engine.driver_recommendations("bk-1").await.unwrap();

    assert_eq!(first.recommendations[0].driver_id, "d2");
    assert_eq!(first, second);
}
