use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::model::{CurrentConditions, ForecastEntry, SunTimes, Wind};

use super::WeatherProvider;

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    /// Point the provider at a different endpoint root; tests use this to
    /// talk to a local mock server.
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url,
            http: Client::new(),
        }
    }

    async fn get_body(&self, endpoint: &str, location: &str) -> Result<String> {
        let url = format!("{}/{endpoint}", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", location),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .with_context(|| format!("Failed to send request to OpenWeather ({endpoint})"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read OpenWeather {endpoint} response body"))?;

        if !status.is_success() {
            return Err(anyhow!(
                "OpenWeather {} request failed with status {}: {}",
                endpoint,
                status,
                truncate_body(&body),
            ));
        }

        Ok(body)
    }
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
    deg: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    sunrise: Option<i64>,
    sunset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: i64,
    weather: Vec<OwWeather>,
    main: Option<OwMain>,
    wind: Option<OwWind>,
    sys: Option<OwSys>,
}

#[derive(Debug, Deserialize)]
struct OwSlotMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastSlot {
    dt: i64,
    main: OwSlotMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastSlot>,
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(&self, location: &str) -> Result<CurrentConditions> {
        let body = self.get_body("weather", location).await?;

        let parsed: OwCurrentResponse =
            serde_json::from_str(&body).context("Failed to parse OpenWeather current JSON")?;

        let category = parsed
            .weather
            .first()
            .map(|w| w.main.clone())
            .unwrap_or_else(|| "Unknown".to_string());

        let sun = parsed.sys.and_then(|sys| match (sys.sunrise, sys.sunset) {
            (Some(sunrise), Some(sunset)) => Some(SunTimes { sunrise, sunset }),
            _ => None,
        });

        Ok(CurrentConditions {
            place_name: parsed.name,
            observed_at: parsed.dt,
            category,
            temperature_c: parsed.main.and_then(|m| m.temp),
            wind: parsed.wind.map(|w| Wind {
                speed_mps: w.speed,
                direction_deg: w.deg,
            }),
            sun,
        })
    }

    async fn forecast(&self, location: &str) -> Result<Vec<ForecastEntry>> {
        let body = self.get_body("forecast", location).await?;

        let parsed: OwForecastResponse =
            serde_json::from_str(&body).context("Failed to parse OpenWeather forecast JSON")?;

        // Order as returned: one slot per 3 hours across 5 days.
        let entries = parsed
            .list
            .into_iter()
            .map(|slot| ForecastEntry {
                at: slot.dt,
                temperature_c: slot.main.temp,
                category: slot
                    .weather
                    .into_iter()
                    .next()
                    .map(|w| w.main)
                    .unwrap_or_else(|| "Unknown".to_string()),
            })
            .collect();

        Ok(entries)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        format!("{}...", &body[..MAX])
    } else {
        body.to_string()
    }
}
