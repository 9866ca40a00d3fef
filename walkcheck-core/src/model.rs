use serde::{Deserialize, Serialize};

use crate::units::{celsius_to_fahrenheit, ms_to_kph};

/// Provider-agnostic snapshot of current weather at one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub temperature_c: f64,
    pub feels_like_c: f64,
    /// Meters per second, never negative.
    pub wind_speed_ms: f64,
    /// Wind speed exactly as a km/h-native provider reported it. When set it is
    /// used for the km/h thresholds instead of converting `wind_speed_ms` back.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reported_wind_kph: Option<f64>,
    /// Last-hour precipitation in millimeters, never negative.
    pub precipitation_mm: f64,
    /// Lowercase coarse category such as "rain", "clear" or "snow".
    pub sky_condition: String,
    /// Free-text description shown to the user, e.g. "light rain".
    pub description: String,
    /// `None` or a non-positive value means visibility is unknown.
    pub visibility_m: Option<f64>,
    pub sunrise_epoch_utc: i64,
    pub sunset_epoch_utc: i64,
    pub utc_offset_seconds: i32,
    pub location_label: String,
}

impl Observation {
    pub fn temperature_f(&self) -> f64 {
        celsius_to_fahrenheit(self.temperature_c)
    }

    pub fn wind_kph(&self) -> f64 {
        self.reported_wind_kph.unwrap_or_else(|| ms_to_kph(self.wind_speed_ms))
    }

    /// True when the sky condition mentions `needle`, ignoring case.
    pub fn condition_contains(&self, needle: &str) -> bool {
        self.sky_condition.to_lowercase().contains(needle)
    }

    /// Visibility in meters, only when it is actually known.
    pub fn known_visibility_m(&self) -> Option<f64> {
        self.visibility_m.filter(|v| *v > 0.0)
    }
}
