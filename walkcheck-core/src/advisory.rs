//! Maps an [`Observation`] to a single walking advisory.
//!
//! Rules are checked in severity order and the first match wins: the four
//! temperature bands, then rain, then wind, then the all-clear.

use serde::Serialize;

use crate::{model::Observation, units::display_round};

const HOT_ABOVE_F: f64 = 85.0;
const WARM_ABOVE_F: f64 = 70.0;
const FREEZING_BELOW_F: f64 = 32.0;
const COLD_BELOW_F: f64 = 45.0;
const WINDY_ABOVE_KPH: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryCategory {
    Hot,
    Warm,
    Freezing,
    Cold,
    Rainy,
    Windy,
    Good,
}

impl AdvisoryCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdvisoryCategory::Hot => "hot",
            AdvisoryCategory::Warm => "warm",
            AdvisoryCategory::Freezing => "freezing",
            AdvisoryCategory::Cold => "cold",
            AdvisoryCategory::Rainy => "rainy",
            AdvisoryCategory::Windy => "windy",
            AdvisoryCategory::Good => "good",
        }
    }
}

impl std::fmt::Display for AdvisoryCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Advisory {
    pub category: AdvisoryCategory,
    pub message: String,
}

/// Pick the advisory category. Never fails.
pub fn categorize(obs: &Observation) -> AdvisoryCategory {
    let temp_f = obs.temperature_f();

    if temp_f > HOT_ABOVE_F {
        AdvisoryCategory::Hot
    } else if temp_f > WARM_ABOVE_F {
        AdvisoryCategory::Warm
    } else if temp_f < FREEZING_BELOW_F {
        AdvisoryCategory::Freezing
    } else if temp_f < COLD_BELOW_F {
        AdvisoryCategory::Cold
    } else if obs.precipitation_mm > 0.0 || obs.condition_contains("rain") {
        AdvisoryCategory::Rainy
    } else if obs.wind_kph() > WINDY_ABOVE_KPH {
        AdvisoryCategory::Windy
    } else {
        AdvisoryCategory::Good
    }
}

/// Categorize and render the message with live values substituted in.
pub fn classify(obs: &Observation) -> Advisory {
    let category = categorize(obs);
    Advisory { category, message: render_message(category, obs) }
}

fn render_message(category: AdvisoryCategory, obs: &Observation) -> String {
    let temps = format!(
        "{}°C / {}°F",
        display_round(obs.temperature_c),
        display_round(obs.temperature_f())
    );

    match category {
        AdvisoryCategory::Hot => {
            format!("\u{1F321}\u{FE0F} Very hot! {temps} - Walk early morning or late evening only!")
        }
        AdvisoryCategory::Warm => {
            format!("\u{2600}\u{FE0F} Hot weather! {temps} - Bring water and watch for hot surfaces.")
        }
        AdvisoryCategory::Freezing => {
            format!("\u{1F976} Freezing! {temps} - Dress warmly and watch for ice.")
        }
        AdvisoryCategory::Cold => {
            format!("\u{2744}\u{FE0F} Cold weather! {temps} - Bundle up for your walk.")
        }
        AdvisoryCategory::Rainy => format!(
            "\u{1F327}\u{FE0F} Rain detected! {}mm - Bring waterproof gear.",
            obs.precipitation_mm
        ),
        AdvisoryCategory::Windy => format!(
            "\u{1F4A8} Very windy! {} km/h - Be careful of debris.",
            display_round(obs.wind_kph())
        ),
        AdvisoryCategory::Good => {
            format!("\u{1F6B6}\u{200D}\u{2640}\u{FE0F} Great walking weather! {temps}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::observation;
    use crate::units::fahrenheit_to_celsius;

    #[test]
    fn hot_wins_over_everything_else() {
        let mut obs = observation(fahrenheit_to_celsius(90.0), "heavy rain");
        obs.precipitation_mm = 12.0;
        obs.wind_speed_ms = 20.0;

        let advisory = classify(&obs);
        assert_eq!(advisory.category, AdvisoryCategory::Hot);
        assert_eq!(
            advisory.message,
            "🌡️ Very hot! 32°C / 90°F - Walk early morning or late evening only!"
        );
    }

    #[test]
    fn temperature_bands_follow_severity_order() {
        let cases = [
            (30.0, AdvisoryCategory::Hot),
            (29.0, AdvisoryCategory::Warm),
            (21.5, AdvisoryCategory::Warm),
            (21.0, AdvisoryCategory::Good),
            (7.5, AdvisoryCategory::Good),
            (7.0, AdvisoryCategory::Cold),
            (0.0, AdvisoryCategory::Cold),
            (-0.5, AdvisoryCategory::Freezing),
        ];

        for (temp_c, expected) in cases {
            let obs = observation(temp_c, "clear");
            assert_eq!(categorize(&obs), expected, "at {temp_c}°C");
        }
    }

    #[test]
    fn just_above_seventy_is_warm() {
        // 22°C is 71.6°F
        let advisory = classify(&observation(22.0, "clear"));
        assert_eq!(advisory.category, AdvisoryCategory::Warm);
        assert_eq!(
            advisory.message,
            "☀️ Hot weather! 22°C / 72°F - Bring water and watch for hot surfaces."
        );
    }

    #[test]
    fn freezing_snow() {
        let mut obs = observation(-5.0, "snow");
        obs.wind_speed_ms = 3.0;

        let advisory = classify(&obs);
        assert_eq!(advisory.category, AdvisoryCategory::Freezing);
        assert_eq!(advisory.message, "🥶 Freezing! -5°C / 23°F - Dress warmly and watch for ice.");
    }

    #[test]
    fn cold_message() {
        let advisory = classify(&observation(5.0, "clouds"));
        assert_eq!(advisory.category, AdvisoryCategory::Cold);
        assert_eq!(advisory.message, "❄️ Cold weather! 5°C / 41°F - Bundle up for your walk.");
    }

    #[test]
    fn rain_after_temperature_bands() {
        let mut obs = observation(18.0, "light rain");
        obs.precipitation_mm = 2.5;

        let advisory = classify(&obs);
        assert_eq!(advisory.category, AdvisoryCategory::Rainy);
        assert_eq!(advisory.message, "🌧️ Rain detected! 2.5mm - Bring waterproof gear.");
    }

    #[test]
    fn rain_condition_without_precipitation() {
        let advisory = classify(&observation(15.0, "Rain"));
        assert_eq!(advisory.category, AdvisoryCategory::Rainy);
        assert_eq!(advisory.message, "🌧️ Rain detected! 0mm - Bring waterproof gear.");
    }

    #[test]
    fn windy_threshold_is_thirty_kph() {
        let mut obs = observation(15.0, "clear");

        obs.wind_speed_ms = 8.0;
        assert_eq!(categorize(&obs), AdvisoryCategory::Good);

        obs.wind_speed_ms = 9.0;
        let advisory = classify(&obs);
        assert_eq!(advisory.category, AdvisoryCategory::Windy);
        assert_eq!(advisory.message, "💨 Very windy! 32 km/h - Be careful of debris.");
    }

    #[test]
    fn good_weather_message() {
        let advisory = classify(&observation(15.0, "clear"));
        assert_eq!(advisory.category, AdvisoryCategory::Good);
        assert_eq!(advisory.message, "🚶‍♀️ Great walking weather! 15°C / 59°F");
    }
}
