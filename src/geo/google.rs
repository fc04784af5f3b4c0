//! Google Geocoding API geocoder.

use super::{Coordinates, GeocodeError, Geocoder};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;

pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com";

#[derive(Debug, Deserialize)]
struct GoogleResponse {
    status: String,
    #[serde(default)]
    results: Vec<GoogleResult>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleResult {
    geometry: GoogleGeometry,
}

#[derive(Debug, Deserialize)]
struct GoogleGeometry {
    location: GoogleLatLng,
}

#[derive(Debug, Deserialize)]
struct GoogleLatLng {
    lat: f64,
    lng: f64,
}

/// Geocoder backed by `GET /maps/api/geocode/json`.
pub struct GoogleGeocoder {
    base_url: String,
    api_key: String,
    client: Arc<Client>,
    timeout_ms: u64,
}

impl GoogleGeocoder {
    pub fn new(base_url: String, api_key: String, client: Arc<Client>, timeout_seconds: u64) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client,
            timeout_ms: timeout_seconds * 1000,
        }
    }
}

// The API key is a credential; keep it out of debug output.
impl std::fmt::Debug for GoogleGeocoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleGeocoder")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    fn name(&self) -> &str {
        "google"
    }

    async fn geocode(&self, address: &str) -> Result<Coordinates, GeocodeError> {
        if address.trim().is_empty() {
            return Err(GeocodeError::EmptyAddress);
        }

        let url = format!("{}/maps/api/geocode/json", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("address", address), ("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| GeocodeError::from_reqwest(e, self.timeout_ms))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GeocodeError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let body: GoogleResponse = response.json().await.map_err(|e| {
            GeocodeError::InvalidResponse(format!("Failed to parse Google response: {}", e))
        })?;

        match body.status.as_str() {
            "OK" => {}
            "ZERO_RESULTS" => return Err(GeocodeError::NotFound(address.to_string())),
            other => {
                return Err(GeocodeError::Upstream {
                    status: status.as_u16(),
                    message: body.error_message.unwrap_or_else(|| other.to_string()),
                })
            }
        }

        let location = body
            .results
            .into_iter()
            .next()
            .map(|r| r.geometry.location)
            .ok_or_else(|| GeocodeError::NotFound(address.to_string()))?;

        Coordinates::try_new(location.lat, location.lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn geocoder(base_url: String) -> GoogleGeocoder {
        GoogleGeocoder::new(base_url, "test-key".to_string(), Arc::new(Client::new()), 5)
    }

    #[tokio::test]
    async fn test_geocode_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/maps/api/geocode/json")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("address".into(), "12 Main St".into()),
                Matcher::UrlEncoded("key".into(), "test-key".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"{"status":"OK","results":[{"geometry":{"location":{"lat":34.05,"lng":-118.25}}}]}"#,
            )
            .create_async()
            .await;

        let coords = geocoder(server.url()).geocode("12 Main St").await.unwrap();

        mock.assert_async().await;
        assert_eq!(coords, Coordinates::new(34.05, -118.25));
    }

    #[tokio::test]
    async fn test_geocode_zero_results() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/maps/api/geocode/json")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"status":"ZERO_RESULTS","results":[]}"#)
            .create_async()
            .await;

        let result = geocoder(server.url()).geocode("Nowhere").await;
        assert!(matches!(result, Err(GeocodeError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_geocode_denied_status() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/maps/api/geocode/json")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"status":"REQUEST_DENIED","error_message":"bad key","results":[]}"#)
            .create_async()
            .await;

        let result = geocoder(server.url()).geocode("12 Main St").await;
        match result {
            Err(GeocodeError::Upstream { message, .. }) => assert_eq!(message, "bad key"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_debug_redacts_key() {
        let g = geocoder("http://localhost".to_string());
        let debug = format!("{:?}", g);
        assert!(!debug.contains("test-key"));
    }
}
