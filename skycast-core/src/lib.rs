//! Core library for the `skycast` terminal weather dashboard.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The weather-data fetcher (current conditions + 5-day forecast)
//! - Location detection and reverse geocoding
//! - Pure formatting, icon-mapping, and derived-state helpers
//!
//! It is used by `skycast-tui`, but can also be reused by other binaries or services.

pub mod config;
pub mod derive;
pub mod format;
pub mod geocode;
pub mod icon;
pub mod locate;
pub mod model;
pub mod provider;

pub use config::{Config, ServiceConfig};
pub use derive::{ForecastCell, HeadlineView, forecast_window, wind_rotation_deg};
pub use icon::WeatherIcon;
pub use locate::{IpLocationSource, LocateError, LocationSource, resolve_city};
pub use model::{CurrentConditions, ForecastEntry, Position, SunTimes, Wind};
pub use provider::{ServiceId, WeatherProvider, provider_from_config};
