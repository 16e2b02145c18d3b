//! Render-time derivations over the fetched state.
//!
//! Nothing here is stored: the view recomputes these on every frame from the
//! latest [`CurrentConditions`] / forecast list.

use crate::format::{clock_of, weekday_of};
use crate::icon::WeatherIcon;
use crate::model::{CurrentConditions, ForecastEntry, Wind};

/// The forecast strip shows entries at these source offsets, an
/// approximation of "one per day" over the 3-hourly list.
pub const FORECAST_WINDOW_START: usize = 2;
pub const FORECAST_WINDOW_LEN: usize = 5;

/// Presentation fields for the "today" panel.
#[derive(Debug, Clone)]
pub struct HeadlineView {
    /// Present only when the response carried sun times; partial data keeps
    /// the weekday blank rather than guessing.
    pub weekday: Option<&'static str>,
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
    pub category: String,
    pub place_name: String,
    pub icon: WeatherIcon,
    pub temperature_c: i64,
    pub wind_speed: i64,
    pub wind_rotation_deg: f64,
}

impl HeadlineView {
    pub fn from_conditions(c: &CurrentConditions) -> Self {
        let weekday = c.sun.map(|_| weekday_of(c.observed_at, 0));
        Self {
            weekday,
            sunrise: c.sun.map(|s| clock_of(s.sunrise)),
            sunset: c.sun.map(|s| clock_of(s.sunset)),
            category: c.category.clone(),
            place_name: c.place_name.clone(),
            icon: WeatherIcon::for_category(&c.category),
            temperature_c: c.temperature_c.unwrap_or(0.0).round() as i64,
            wind_speed: c.wind.map(|w| w.speed_mps).unwrap_or(0.0).round() as i64,
            wind_rotation_deg: wind_rotation_deg(c.wind.as_ref()),
        }
    }
}

/// Rotation applied to a north-pointing arrow so it points where the wind
/// blows toward; direction defaults to 0 when absent. Not normalized.
pub fn wind_rotation_deg(wind: Option<&Wind>) -> f64 {
    180.0 + wind.and_then(|w| w.direction_deg).unwrap_or(0.0)
}

/// One cell of the forecast strip.
#[derive(Debug, Clone)]
pub struct ForecastCell {
    pub weekday: &'static str,
    pub icon: WeatherIcon,
    pub temperature_c: i64,
}

/// Project the raw slot list onto the 5 displayed cells (fewer if the list
/// is short). Each cell's weekday comes from its own slot timestamp shifted
/// by its position in the window.
pub fn forecast_window(entries: &[ForecastEntry]) -> Vec<ForecastCell> {
    entries
        .iter()
        .skip(FORECAST_WINDOW_START)
        .take(FORECAST_WINDOW_LEN)
        .enumerate()
        .map(|(i, entry)| ForecastCell {
            weekday: weekday_of(entry.at, i),
            icon: WeatherIcon::for_category(&entry.category),
            temperature_c: entry.temperature_c.round() as i64,
        })
        .collect()
}
