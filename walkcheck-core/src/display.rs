use serde::Serialize;

use crate::{
    model::Observation,
    units::{
        celsius_to_fahrenheit, display_round, epoch_to_local_time_label, meters_to_km, ms_to_mph,
    },
};

/// Marker shown for a value the provider did not report.
pub const UNKNOWN: &str = "N/A";

/// Formatted strings handed to a presentation sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayFields {
    pub condition: String,
    pub temp_label: String,
    pub location_label: String,
    pub rain_label: String,
    pub wind_label: String,
    pub feels_like_label: String,
    pub sunrise_label: String,
    pub sunset_label: String,
    pub visibility_label: String,
}

impl DisplayFields {
    pub fn from_observation(obs: &Observation) -> Self {
        Self {
            condition: obs.description.clone(),
            temp_label: dual_temperature(obs.temperature_c),
            location_label: obs.location_label.clone(),
            rain_label: rain_label(obs.precipitation_mm),
            wind_label: format!(
                "{} kph / {} mph",
                display_round(obs.wind_kph()),
                display_round(ms_to_mph(obs.wind_speed_ms))
            ),
            feels_like_label: dual_temperature(obs.feels_like_c),
            sunrise_label: epoch_to_local_time_label(obs.sunrise_epoch_utc, obs.utc_offset_seconds),
            sunset_label: epoch_to_local_time_label(obs.sunset_epoch_utc, obs.utc_offset_seconds),
            visibility_label: visibility_label(obs.visibility_m),
        }
    }
}

fn dual_temperature(c: f64) -> String {
    format!("{}°C / {}°F", display_round(c), display_round(celsius_to_fahrenheit(c)))
}

fn rain_label(mm: f64) -> String {
    if mm > 0.0 { format!("{mm} mm") } else { "0 mm".to_string() }
}

fn visibility_label(meters: Option<f64>) -> String {
    match meters {
        Some(m) if m > 0.0 => format!("{} km", meters_to_km(m)),
        _ => UNKNOWN.to_string(),
    }
}
