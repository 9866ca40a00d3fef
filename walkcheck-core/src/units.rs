//! Pure unit conversions used for display and classification.
//!
//! Conversions return unrounded values; the `display_*` helpers round for
//! presentation only. Rounded values must not be fed back into arithmetic.

use chrono::{DateTime, Timelike};

pub fn celsius_to_fahrenheit(c: f64) -> f64 {
    c * 9.0 / 5.0 + 32.0
}

pub fn fahrenheit_to_celsius(f: f64) -> f64 {
    (f - 32.0) * 5.0 / 9.0
}

pub fn ms_to_kph(v: f64) -> f64 {
    v * 3.6
}

pub fn kph_to_ms(v: f64) -> f64 {
    v / 3.6
}

pub fn ms_to_mph(v: f64) -> f64 {
    v * 2.237
}

/// Meters to whole kilometers.
pub fn meters_to_km(v: f64) -> i64 {
    display_round(v / 1000.0)
}

/// Round to the nearest integer, halves toward positive infinity
/// (`-2.5` becomes `-2`, `2.5` becomes `3`).
pub fn display_round(v: f64) -> i64 {
    let nearest = v.round();
    // `round` sends negative halves away from zero; pull them back up.
    if v - nearest == 0.5 { nearest as i64 + 1 } else { nearest as i64 }
}

/// Format `epoch + offset_seconds` as a 12-hour wall-clock label, e.g. `6:05 AM`.
///
/// The shifted instant is read as-is; no further timezone is applied.
pub fn epoch_to_local_time_label(epoch: i64, offset_seconds: i32) -> String {
    let shifted = epoch.saturating_add(i64::from(offset_seconds));
    let (hour, minute) = match DateTime::from_timestamp(shifted, 0) {
        Some(dt) => (dt.hour(), dt.minute()),
        // Outside chrono's range; fall back to plain modular arithmetic.
        None => {
            let secs_of_day = shifted.rem_euclid(86_400);
            ((secs_of_day / 3600) as u32, ((secs_of_day % 3600) / 60) as u32)
        }
    };

    let meridiem = if hour >= 12 { "PM" } else { "AM" };
    let display_hour = match hour % 12 {
        0 => 12,
        h => h,
    };

    format!("{display_hour}:{minute:02} {meridiem}")
}
