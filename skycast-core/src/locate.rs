//! One-shot location detection for the startup path.
//!
//! The dashboard runs this exactly once: position lookup, then reverse
//! geocoding. Every failure is logged and swallowed; the location stays
//! empty until the user types one.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::fmt::Debug;
use thiserror::Error;

use crate::geocode::reverse_geocode;
use crate::model::Position;

#[derive(Debug, Error)]
pub enum LocateError {
    /// The service refused to position this client.
    #[error("location access denied")]
    Denied,
    /// No usable location capability (service reported failure or gave an
    /// unusable response).
    #[error("no location capability available")]
    Unavailable,
    #[error("location lookup failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// One-shot access to the machine's position.
#[async_trait]
pub trait LocationSource: Send + Sync + Debug {
    async fn position(&self) -> Result<Position, LocateError>;
}

const IP_API_URL: &str = "http://ip-api.com/json";

/// Coordinates from the machine's public IP address, the terminal analogue
/// of a platform geolocation capability.
#[derive(Debug, Clone)]
pub struct IpLocationSource {
    base_url: String,
    http: Client,
}

impl IpLocationSource {
    pub fn new() -> Self {
        Self::with_base_url(IP_API_URL.to_string())
    }

    pub fn with_base_url(base_url: String) -> Self {
        Self {
            base_url,
            http: Client::new(),
        }
    }
}

impl Default for IpLocationSource {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    lat: Option<f64>,
    lon: Option<f64>,
}

#[async_trait]
impl LocationSource for IpLocationSource {
    async fn position(&self) -> Result<Position, LocateError> {
        let res = self
            .http
            .get(&self.base_url)
            .query(&[("fields", "status,lat,lon")])
            .send()
            .await?;

        if res.status() == StatusCode::FORBIDDEN {
            return Err(LocateError::Denied);
        }

        let parsed: IpApiResponse = res.json().await?;

        match (parsed.status.as_str(), parsed.lat, parsed.lon) {
            ("success", Some(lat), Some(lon)) => Ok(Position {
                latitude: lat,
                longitude: lon,
            }),
            _ => Err(LocateError::Unavailable),
        }
    }
}

/// Resolve the startup city: position first, then reverse geocoding.
///
/// `None` on any failure, with the reason going to the log stream only.
pub async fn resolve_city(source: &dyn LocationSource, geocode_api_key: &str) -> Option<String> {
    let position = match source.position().await {
        Ok(p) => p,
        Err(LocateError::Denied) => {
            tracing::info!("Location access denied");
            return None;
        }
        Err(LocateError::Unavailable) => {
            tracing::info!("No location capability available");
            return None;
        }
        Err(e) => {
            tracing::debug!("Position lookup failed: {e}");
            return None;
        }
    };

    tracing::debug!(
        "Position resolved: {:.4}, {:.4}",
        position.latitude,
        position.longitude
    );

    reverse_geocode(position, geocode_api_key).await
}
