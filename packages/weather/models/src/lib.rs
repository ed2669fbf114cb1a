#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Weather snapshot and forecast types.
//!
//! A [`SnapshotSet`] is the result of one refresh over every capital on
//! the map. Cities whose fetch failed are present with a `None` value:
//! absence is a normal state, not an error.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Current conditions at a single capital.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    /// Air temperature at 2 m, in degrees Celsius.
    pub temperature_c: f64,
    /// WMO weather interpretation code.
    pub weather_code: u8,
    /// Wind speed at 10 m, in km/h; `None` when the response omits it.
    pub wind_speed_kmh: Option<f64>,
}

impl WeatherSnapshot {
    /// Human-readable description of the weather code.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        weather_code::describe(self.weather_code)
    }

    /// Emoji icon for the weather code.
    #[must_use]
    pub const fn icon(&self) -> &'static str {
        weather_code::icon(self.weather_code)
    }
}

/// One day of the daily forecast series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyForecast {
    /// Local calendar date at the capital.
    pub date: NaiveDate,
    /// Daily maximum temperature, degrees Celsius.
    pub max_c: f64,
    /// Daily minimum temperature, degrees Celsius.
    pub min_c: f64,
    /// Total precipitation, millimetres.
    pub precipitation_mm: f64,
    /// WMO weather interpretation code for the day.
    pub weather_code: u8,
}

/// The complete result of one refresh cycle, replaced as a unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotSet {
    /// Refresh generation that produced this set.
    pub generation: u64,
    /// When the refresh completed.
    pub fetched_at: DateTime<Utc>,
    /// One entry per capital city; `None` where the fetch failed.
    pub entries: BTreeMap<String, Option<WeatherSnapshot>>,
}

impl SnapshotSet {
    /// Returns the snapshot for a city, if it was fetched successfully.
    #[must_use]
    pub fn get(&self, city: &str) -> Option<&WeatherSnapshot> {
        self.entries.get(city).and_then(Option::as_ref)
    }

    /// Number of cities with data.
    #[must_use]
    pub fn available_count(&self) -> usize {
        self.entries.values().filter(|v| v.is_some()).count()
    }

    /// Cities whose fetch failed, in name order.
    #[must_use]
    pub fn absent_cities(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, v)| v.is_none())
            .map(|(city, _)| city.as_str())
            .collect()
    }
}

/// WMO weather interpretation codes as used by Open-Meteo.
pub mod weather_code {
    /// Short description for a weather code; `"Unknown"` otherwise.
    #[must_use]
    pub const fn describe(code: u8) -> &'static str {
        match code {
            0 => "Clear sky",
            1 => "Mainly clear",
            2 => "Partly cloudy",
            3 => "Overcast",
            45 => "Fog",
            48 => "Depositing rime fog",
            51 => "Light drizzle",
            53 => "Moderate drizzle",
            55 => "Dense drizzle",
            61 => "Slight rain",
            63 => "Moderate rain",
            65 => "Heavy rain",
            71 => "Slight snow",
            73 => "Moderate snow",
            75 => "Heavy snow",
            80 => "Slight rain showers",
            81 => "Moderate rain showers",
            82 => "Violent rain showers",
            95 => "Thunderstorm",
            96 => "Thunderstorm with hail",
            99 => "Thunderstorm with heavy hail",
            _ => "Unknown",
        }
    }

    /// Emoji icon for a weather code; `"❓"` otherwise.
    #[must_use]
    pub const fn icon(code: u8) -> &'static str {
        match code {
            0 => "☀️",
            1 => "🌤️",
            2 => "⛅",
            3 => "☁️",
            45 | 48 => "🌫️",
            51 | 53 | 55 | 80 | 81 | 82 => "🌦️",
            61 | 63 | 65 => "🌧️",
            71 | 73 | 75 => "❄️",
            95 | 96 | 99 => "⛈️",
            _ => "❓",
        }
    }
}
