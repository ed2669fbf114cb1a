//! Open-Meteo forecast API client.
//!
//! Requests current conditions (`current=temperature_2m,weathercode,...`)
//! and the daily series (`daily=temperature_2m_max,...`) for a single
//! coordinate. Only the fields the map uses are decoded; anything else
//! in the response is ignored.
//!
//! See <https://open-meteo.com/en/docs>

use chrono::NaiveDate;
use mausam_map_weather_models::{DailyForecast, WeatherSnapshot};
use serde::Deserialize;

use crate::{WeatherError, WeatherProvider};

/// Default forecast endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com/v1/forecast";

const CURRENT_FIELDS: &str = "temperature_2m,weathercode,wind_speed_10m";
const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min,precipitation_sum,weathercode";

/// Client for the Open-Meteo forecast endpoint.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: reqwest::Client,
    base_url: String,
}

impl OpenMeteoClient {
    /// Creates a client against `base_url` (see [`DEFAULT_BASE_URL`]).
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.to_owned(),
        }
    }

    /// Issues one forecast request and returns the raw body.
    async fn request(
        &self,
        lat: f64,
        lon: f64,
        block: &str,
        fields: &str,
    ) -> Result<String, WeatherError> {
        let lat = lat.to_string();
        let lon = lon.to_string();

        let resp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("latitude", lat.as_str()),
                ("longitude", lon.as_str()),
                (block, fields),
                ("timezone", "auto"),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(WeatherError::Status {
                status: resp.status().as_u16(),
            });
        }

        Ok(resp.text().await?)
    }
}

impl WeatherProvider for OpenMeteoClient {
    async fn current(&self, lat: f64, lon: f64) -> Result<WeatherSnapshot, WeatherError> {
        let body = self.request(lat, lon, "current", CURRENT_FIELDS).await?;
        parse_current(&body)
    }

    async fn daily(&self, lat: f64, lon: f64) -> Result<Vec<DailyForecast>, WeatherError> {
        let body = self.request(lat, lon, "daily", DAILY_FIELDS).await?;
        parse_daily(&body)
    }
}

#[derive(Deserialize)]
struct CurrentResponse {
    current: CurrentBlock,
}

#[derive(Deserialize)]
struct CurrentBlock {
    temperature_2m: f64,
    #[serde(alias = "weather_code")]
    weathercode: u8,
    #[serde(default)]
    wind_speed_10m: Option<f64>,
}

#[derive(Deserialize)]
struct DailyResponse {
    daily: DailyBlock,
}

#[derive(Deserialize)]
struct DailyBlock {
    time: Vec<String>,
    temperature_2m_max: Vec<f64>,
    temperature_2m_min: Vec<f64>,
    precipitation_sum: Vec<f64>,
    #[serde(alias = "weather_code")]
    weathercode: Vec<u8>,
}

fn parse_error(message: impl Into<String>) -> WeatherError {
    WeatherError::Parse {
        message: message.into(),
    }
}

/// Decodes a `{ current: { temperature_2m, weathercode, wind_speed_10m } }`
/// body. Wind speed is optional.
///
/// # Errors
///
/// Returns [`WeatherError::Parse`] if the body does not match.
pub fn parse_current(body: &str) -> Result<WeatherSnapshot, WeatherError> {
    let resp: CurrentResponse = serde_json::from_str(body)
        .map_err(|e| parse_error(format!("Failed to parse current conditions: {e}")))?;

    Ok(WeatherSnapshot {
        temperature_c: resp.current.temperature_2m,
        weather_code: resp.current.weathercode,
        wind_speed_kmh: resp.current.wind_speed_10m,
    })
}

/// Decodes a `{ daily: { time, temperature_2m_max, ... } }` body into one
/// row per day.
///
/// # Errors
///
/// Returns [`WeatherError::Parse`] if the body does not match, a date is
/// not `YYYY-MM-DD`, or the parallel arrays differ in length.
pub fn parse_daily(body: &str) -> Result<Vec<DailyForecast>, WeatherError> {
    let resp: DailyResponse = serde_json::from_str(body)
        .map_err(|e| parse_error(format!("Failed to parse daily forecast: {e}")))?;
    let daily = resp.daily;

    let days = daily.time.len();
    if daily.temperature_2m_max.len() != days
        || daily.temperature_2m_min.len() != days
        || daily.precipitation_sum.len() != days
        || daily.weathercode.len() != days
    {
        return Err(parse_error(format!(
            "Daily series lengths differ (time={days}, max={}, min={}, precipitation={}, code={})",
            daily.temperature_2m_max.len(),
            daily.temperature_2m_min.len(),
            daily.precipitation_sum.len(),
            daily.weathercode.len(),
        )));
    }

    daily
        .time
        .iter()
        .enumerate()
        .map(|(i, date)| {
            let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .map_err(|e| parse_error(format!("Invalid forecast date '{date}': {e}")))?;
            Ok(DailyForecast {
                date,
                max_c: daily.temperature_2m_max[i],
                min_c: daily.temperature_2m_min[i],
                precipitation_mm: daily.precipitation_sum[i],
                weather_code: daily.weathercode[i],
            })
        })
        .collect()
}
