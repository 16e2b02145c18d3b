use crate::{
    Config,
    model::{CurrentConditions, ForecastEntry},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::{convert::TryFrom, fmt::Debug};

pub mod openweather;

/// External services the dashboard holds credentials for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceId {
    /// Weather data (current conditions + forecast).
    OpenWeather,
    /// Reverse geocoding.
    OpenCage,
}

impl ServiceId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceId::OpenWeather => "openweather",
            ServiceId::OpenCage => "opencage",
        }
    }

    pub const fn all() -> &'static [ServiceId] {
        &[ServiceId::OpenWeather, ServiceId::OpenCage]
    }
}

impl std::fmt::Display for ServiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ServiceId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "openweather" => Ok(ServiceId::OpenWeather),
            "opencage" => Ok(ServiceId::OpenCage),
            _ => Err(anyhow::anyhow!(
                "Unknown service '{value}'. Supported services: openweather, opencage."
            )),
        }
    }
}

/// The two retrieval calls the dashboard issues. They are independent: the
/// caller may run them concurrently and neither waits for the other.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, location: &str) -> anyhow::Result<CurrentConditions>;
    async fn forecast(&self, location: &str) -> anyhow::Result<Vec<ForecastEntry>>;
}

/// Construct the weather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.service_api_key(ServiceId::OpenWeather).ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured for service 'openweather'.\n\
                 Hint: run `skycast configure openweather` and enter your API key."
        )
    })?;

    Ok(Box::new(OpenWeatherProvider::new(api_key.to_owned())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn service_id_as_str_roundtrip() {
        for id in ServiceId::all() {
            let s = id.as_str();
            let parsed = ServiceId::try_from(s).expect("roundtrip should succeed");
            assert_eq!(*id, parsed);
        }
    }

    #[test]
    fn service_id_parse_is_case_insensitive() {
        assert_eq!(ServiceId::try_from("OpenWeather").unwrap(), ServiceId::OpenWeather);
        assert_eq!(ServiceId::try_from("OPENCAGE").unwrap(), ServiceId::OpenCage);
    }

    #[test]
    fn unknown_service_error() {
        let err = ServiceId::try_from("doesnotexist").unwrap_err();
        assert!(err.to_string().contains("Unknown service"));
    }

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = provider_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("No API key configured for service"));
        assert!(err.to_string().contains("Hint: run `skycast configure"));
    }

    #[test]
    fn provider_from_config_works_when_configured() {
        let mut cfg = Config::default();
        cfg.upsert_service_api_key(ServiceId::OpenWeather, "KEY".to_string());

        assert!(provider_from_config(&cfg).is_ok());
    }
}
