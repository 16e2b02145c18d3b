use serde::{Deserialize, Serialize};

/// Latest snapshot of present-moment weather for the selected location.
///
/// Replaced wholesale on every successful fetch. Optional fields mirror what
/// the upstream API may omit; consumers treat `None` as "no data", not zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// Place name as reported by the weather API (not the query string).
    pub place_name: String,
    /// Observation time, unix seconds.
    pub observed_at: i64,
    /// Coarse category label, e.g. "Clear", "Clouds", "Rain".
    pub category: String,
    pub temperature_c: Option<f64>,
    pub wind: Option<Wind>,
    pub sun: Option<SunTimes>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Wind {
    pub speed_mps: f64,
    /// Meteorological direction in degrees; the API omits it in calm air.
    pub direction_deg: Option<f64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SunTimes {
    /// Unix seconds.
    pub sunrise: i64,
    /// Unix seconds.
    pub sunset: i64,
}

/// One 3-hour forecast slot, in the order the API returned it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastEntry {
    /// Slot time, unix seconds.
    pub at: i64,
    pub temperature_c: f64,
    pub category: String,
}

/// Device coordinates from a location source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}
