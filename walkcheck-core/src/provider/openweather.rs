use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::{FetchError, Observation};

use super::{ProviderId, WeatherProvider, normalize_base_url, truncate_body};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, base_url: Option<String>, http: Client) -> Self {
        Self { api_key, base_url: normalize_base_url(base_url, DEFAULT_BASE_URL), http }
    }

    #[instrument(skip(self), fields(provider = "openweather"))]
    async fn fetch_current(&self, city: &str) -> Result<Observation, FetchError> {
        let url = format!("{}/weather", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[("q", city), ("appid", self.api_key.as_str()), ("units", "metric")])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;
        debug!(%status, bytes = body.len(), "OpenWeather responded");

        if !status.is_success() {
            warn!(%status, body = %truncate_body(&body), "OpenWeather request failed");
            return Err(status_error(status, &body));
        }

        normalize(&body)
    }
}

fn status_error(status: StatusCode, body: &str) -> FetchError {
    let detail = format!("OpenWeather returned {status}: {}", truncate_body(body));
    match status {
        StatusCode::NOT_FOUND => FetchError::NotFound(detail),
        StatusCode::UNAUTHORIZED => FetchError::AuthError(detail),
        _ => FetchError::TransientFailure(detail),
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Default, Deserialize)]
struct OwWind {
    #[serde(default)]
    speed: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OwSys {
    #[serde(default)]
    country: String,
    #[serde(default)]
    sunrise: i64,
    #[serde(default)]
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
    #[serde(default)]
    wind: OwWind,
    #[serde(default)]
    rain: Option<HashMap<String, f64>>,
    #[serde(default)]
    sys: OwSys,
    visibility: Option<f64>,
    #[serde(default)]
    timezone: i32,
}

/// Turn an OpenWeather current-weather JSON body into an [`Observation`].
pub fn normalize(body: &str) -> Result<Observation, FetchError> {
    let parsed: OwCurrentResponse = serde_json::from_str(body)?;

    let weather = parsed
        .weather
        .first()
        .ok_or_else(|| FetchError::MalformedResponse("no entries in `weather`".to_string()))?;

    if parsed.name.trim().is_empty() {
        return Err(FetchError::MalformedResponse("empty location `name`".to_string()));
    }

    let location_label = if parsed.sys.country.is_empty() {
        parsed.name.clone()
    } else {
        format!("{}, {}", parsed.name, parsed.sys.country)
    };

    let precipitation_mm =
        parsed.rain.as_ref().and_then(|rain| rain.get("1h").copied()).unwrap_or(0.0).max(0.0);

    let description = if weather.description.is_empty() {
        weather.main.clone()
    } else {
        weather.description.clone()
    };

    Ok(Observation {
        temperature_c: parsed.main.temp,
        feels_like_c: parsed.main.feels_like.unwrap_or(parsed.main.temp),
        wind_speed_ms: parsed.wind.speed.max(0.0),
        reported_wind_kph: None,
        precipitation_mm,
        sky_condition: weather.main.to_lowercase(),
        description,
        visibility_m: parsed.visibility,
        sunrise_epoch_utc: parsed.sys.sunrise,
        sunset_epoch_utc: parsed.sys.sunset,
        utc_offset_seconds: parsed.timezone,
        location_label,
    })
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    fn id(&self) -> ProviderId {
        ProviderId::OpenWeather
    }

    async fn fetch_observation(&self, city: &str) -> Result<Observation, FetchError> {
        self.fetch_current(city).await
    }
}
