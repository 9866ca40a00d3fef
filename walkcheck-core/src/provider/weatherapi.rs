use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::{FetchError, Observation, units::kph_to_ms};

use super::{ProviderId, WeatherProvider, normalize_base_url, truncate_body};

pub const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com/v1";

/// WeatherAPI error code for "No matching location found".
const NO_LOCATION_FOUND: i64 = 1006;

#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl WeatherApiProvider {
    pub fn new(api_key: String, base_url: Option<String>, http: Client) -> Self {
        Self { api_key, base_url: normalize_base_url(base_url, DEFAULT_BASE_URL), http }
    }

    // forecast.json rather than current.json: only the forecast carries sunrise/sunset.
    #[instrument(skip(self), fields(provider = "weatherapi"))]
    async fn fetch_current(&self, city: &str) -> Result<Observation, FetchError> {
        let url = format!("{}/forecast.json", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("q", city),
                ("days", "1"),
                ("aqi", "no"),
                ("alerts", "no"),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;
        debug!(%status, bytes = body.len(), "WeatherAPI responded");

        if !status.is_success() {
            warn!(%status, body = %truncate_body(&body), "WeatherAPI request failed");
            return Err(status_error(status, &body));
        }

        normalize(&body)
    }
}

#[derive(Debug, Deserialize)]
struct WaErrorBody {
    error: WaErrorDetail,
}

#[derive(Debug, Deserialize)]
struct WaErrorDetail {
    code: i64,
}

fn status_error(status: StatusCode, body: &str) -> FetchError {
    let detail = format!("WeatherAPI returned {status}: {}", truncate_body(body));
    let code = serde_json::from_str::<WaErrorBody>(body).ok().map(|b| b.error.code);

    match (status, code) {
        (StatusCode::BAD_REQUEST, Some(NO_LOCATION_FOUND)) => FetchError::NotFound(detail),
        (StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN, _) => FetchError::AuthError(detail),
        _ => FetchError::TransientFailure(detail),
    }
}

#[derive(Debug, Deserialize)]
struct WaLocation {
    name: String,
    #[serde(default)]
    country: String,
    localtime_epoch: Option<i64>,
    /// Local wall-clock time, "YYYY-MM-DD H:MM".
    localtime: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WaCondition {
    text: String,
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_c: f64,
    feelslike_c: Option<f64>,
    #[serde(default)]
    wind_kph: f64,
    #[serde(default)]
    precip_mm: f64,
    vis_km: Option<f64>,
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaAstro {
    sunrise: String,
    sunset: String,
}

#[derive(Debug, Deserialize)]
struct WaForecastDay {
    astro: Option<WaAstro>,
}

#[derive(Debug, Default, Deserialize)]
struct WaForecast {
    #[serde(default)]
    forecastday: Vec<WaForecastDay>,
}

#[derive(Debug, Deserialize)]
struct WaResponse {
    location: WaLocation,
    current: WaCurrent,
    #[serde(default)]
    forecast: WaForecast,
}

/// Turn a WeatherAPI forecast JSON body into an [`Observation`].
pub fn normalize(body: &str) -> Result<Observation, FetchError> {
    let parsed: WaResponse = serde_json::from_str(body)?;

    if parsed.location.name.trim().is_empty() {
        return Err(FetchError::MalformedResponse("empty `location.name`".to_string()));
    }

    let local_now = parsed.location.localtime.as_deref().and_then(parse_localtime);
    let utc_offset_seconds = match (local_now, parsed.location.localtime_epoch) {
        (Some(local), Some(epoch)) => utc_offset(local, epoch),
        _ => 0,
    };

    let astro = parsed.forecast.forecastday.first().and_then(|day| day.astro.as_ref());
    let local_date = local_now.map(|dt| dt.date());
    let astro_epoch = |label: Option<&String>| -> i64 {
        match (local_date, label) {
            (Some(date), Some(label)) => {
                astro_to_epoch(date, label, utc_offset_seconds).unwrap_or_else(|| {
                    debug!(label = %label, "unparseable astro time");
                    0
                })
            }
            _ => 0,
        }
    };

    let wind_kph = parsed.current.wind_kph.max(0.0);

    let location_label = if parsed.location.country.is_empty() {
        parsed.location.name.clone()
    } else {
        format!("{}, {}", parsed.location.name, parsed.location.country)
    };

    Ok(Observation {
        temperature_c: parsed.current.temp_c,
        feels_like_c: parsed.current.feelslike_c.unwrap_or(parsed.current.temp_c),
        wind_speed_ms: kph_to_ms(wind_kph),
        reported_wind_kph: Some(wind_kph),
        precipitation_mm: parsed.current.precip_mm.max(0.0),
        sky_condition: parsed.current.condition.text.to_lowercase(),
        description: parsed.current.condition.text.clone(),
        visibility_m: parsed.current.vis_km.map(|km| km * 1000.0),
        sunrise_epoch_utc: astro_epoch(astro.map(|a| &a.sunrise)),
        sunset_epoch_utc: astro_epoch(astro.map(|a| &a.sunset)),
        utc_offset_seconds,
        location_label,
    })
}

fn parse_localtime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s.trim(), "%Y-%m-%d %H:%M").ok()
}

/// Offset between the local wall clock and UTC, snapped to 15 minutes since
/// `localtime` is truncated to the minute while the epoch is not.
fn utc_offset(local: NaiveDateTime, epoch: i64) -> i32 {
    const QUARTER_HOUR: i64 = 900;
    let raw = local.and_utc().timestamp() - epoch;
    let snapped = (raw as f64 / QUARTER_HOUR as f64).round() as i64 * QUARTER_HOUR;
    i32::try_from(snapped).unwrap_or(0)
}

/// "06:45 AM" on the location's local date, as a UTC epoch.
fn astro_to_epoch(date: NaiveDate, label: &str, utc_offset_seconds: i32) -> Option<i64> {
    let time = NaiveTime::parse_from_str(label.trim(), "%I:%M %p").ok()?;
    Some(date.and_time(time).and_utc().timestamp() - i64::from(utc_offset_seconds))
}

#[async_trait]
impl WeatherProvider for WeatherApiProvider {
    fn id(&self) -> ProviderId {
        ProviderId::WeatherApi
    }

    async fn fetch_observation(&self, city: &str) -> Result<Observation, FetchError> {
        self.fetch_current(city).await
    }
}
