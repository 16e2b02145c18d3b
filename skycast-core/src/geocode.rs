//! Reverse geocoding: convert device coordinates to a city name via OpenCage.

use reqwest::Client;
use serde::Deserialize;

use crate::model::Position;

const OPENCAGE_URL: &str = "https://api.opencagedata.com/geocode/v1/json";

#[derive(Debug, Deserialize)]
struct OpenCageResponse {
    results: Vec<OpenCageResult>,
}

#[derive(Debug, Deserialize)]
struct OpenCageResult {
    components: OpenCageComponents,
}

#[derive(Debug, Deserialize)]
struct OpenCageComponents {
    city: Option<String>,
}

/// Reverse geocode coordinates to a city name.
///
/// Returns `None` on any failure; the dashboard simply starts without a
/// resolved location and the failure goes to the log stream only.
pub async fn reverse_geocode(position: Position, api_key: &str) -> Option<String> {
    reverse_geocode_at(OPENCAGE_URL, position, api_key).await
}

async fn reverse_geocode_at(base_url: &str, position: Position, api_key: &str) -> Option<String> {
    let query = format!("{},{}", position.latitude, position.longitude);

    let response = match Client::new()
        .get(base_url)
        .query(&[("q", query.as_str()), ("key", api_key)])
        .send()
        .await
    {
        Ok(r) => r,
        Err(e) => {
            tracing::debug!("Reverse geocode request failed: {e}");
            return None;
        }
    };

    if !response.status().is_success() {
        tracing::debug!("Reverse geocode returned status {}", response.status());
        return None;
    }

    let body: OpenCageResponse = match response.json().await {
        Ok(b) => b,
        Err(e) => {
            tracing::debug!("Reverse geocode parse error: {e}");
            return None;
        }
    };

    let city = body.results.into_iter().next().and_then(|r| r.components.city);

    match &city {
        Some(name) => tracing::info!("Reverse geocoded to: {name}"),
        None => tracing::debug!("Reverse geocode response carried no city"),
    }

    city
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn extracts_the_first_result_city() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .and(query_param("q", "48.8566,2.3522"))
            .and(query_param("key", "GEO_KEY"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [
                    { "components": { "city": "Paris", "country": "France" } },
                    { "components": { "city": "Boulogne-Billancourt" } }
                ]
            })))
            .mount(&server)
            .await;

        let position = Position { latitude: 48.8566, longitude: 2.3522 };
        let city = reverse_geocode_at(&server.uri(), position, "GEO_KEY").await;

        assert_eq!(city.as_deref(), Some("Paris"));
    }

    #[tokio::test]
    async fn empty_results_yield_none() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": []
            })))
            .mount(&server)
            .await;

        let position = Position { latitude: 0.0, longitude: 0.0 };
        assert_eq!(reverse_geocode_at(&server.uri(), position, "GEO_KEY").await, None);
    }

    #[tokio::test]
    async fn http_errors_yield_none() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(402).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let position = Position { latitude: 0.0, longitude: 0.0 };
        assert_eq!(reverse_geocode_at(&server.uri(), position, "GEO_KEY").await, None);
    }
}
