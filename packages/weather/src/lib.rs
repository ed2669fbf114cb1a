#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Live weather for the capitals on the map.
//!
//! [`open_meteo`] talks to the upstream forecast API; [`aggregator`]
//! fans a refresh out to every capital at once and publishes the
//! resulting [`mausam_map_weather_models::SnapshotSet`]. Both sides meet
//! at the [`WeatherProvider`] trait so the aggregator can be driven by a
//! fake in tests.

pub mod aggregator;
pub mod open_meteo;

use mausam_map_weather_models::{DailyForecast, WeatherSnapshot};
use thiserror::Error;

/// Errors from a single upstream weather request.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// HTTP request failed (connection, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The upstream answered with a non-success status.
    #[error("Weather request failed with status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// The response body did not match the expected contract.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },
}

impl WeatherError {
    /// Returns `true` if the body arrived but was malformed.
    #[must_use]
    pub const fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}

/// A source of current conditions and daily forecasts by coordinate.
pub trait WeatherProvider: Send + Sync {
    /// Fetches current conditions at a coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`WeatherError`] if the request fails, the upstream
    /// answers with a non-success status, or the body is malformed.
    fn current(
        &self,
        lat: f64,
        lon: f64,
    ) -> impl std::future::Future<Output = Result<WeatherSnapshot, WeatherError>> + Send;

    /// Fetches the daily forecast series at a coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`WeatherError`] if the request fails, the upstream
    /// answers with a non-success status, or the body is malformed.
    fn daily(
        &self,
        lat: f64,
        lon: f64,
    ) -> impl std::future::Future<Output = Result<Vec<DailyForecast>, WeatherError>> + Send;
}
