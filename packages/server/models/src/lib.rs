#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API response types for the mausam map server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the resolution types in `mausam_map_region` to allow independent
//! evolution of the API contract.

use chrono::{DateTime, Utc};
use mausam_map_dataset_models::DatasetId;
use mausam_map_region_models::{MarkerColor, MarkerIcon};
use mausam_map_weather_models::{SnapshotSet, WeatherSnapshot};
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the server is healthy.
    pub healthy: bool,
    /// Server version.
    pub version: String,
}

/// A display mode as listed in the navigation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMode {
    /// Mode name as used in routes (e.g. `landcover`).
    pub name: String,
    /// Navigation label.
    pub label: String,
    pub color: MarkerColor,
    pub icon: MarkerIcon,
    /// Drill-down route template such as `/weather/{city}`.
    pub detail_route: Option<String>,
    /// Backing dataset, absent for live weather and unknown modes.
    pub dataset: Option<DatasetId>,
    /// Whether markers carry live weather.
    pub uses_live_weather: bool,
}

/// Current conditions as shown in a marker popup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiWeather {
    /// Temperature in degrees Celsius.
    pub temperature_c: f64,
    /// WMO weather code.
    pub weather_code: u8,
    /// Wind speed at 10 m in km/h, when reported.
    pub wind_speed_kmh: Option<f64>,
    /// Description of the weather code.
    pub description: String,
    /// Emoji icon for the weather code.
    pub icon: String,
}

impl From<WeatherSnapshot> for ApiWeather {
    fn from(snapshot: WeatherSnapshot) -> Self {
        Self {
            temperature_c: snapshot.temperature_c,
            weather_code: snapshot.weather_code,
            wind_speed_kmh: snapshot.wind_speed_kmh,
            description: snapshot.description().to_string(),
            icon: snapshot.icon().to_string(),
        }
    }
}

/// A marker as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMarker {
    /// State or union territory.
    pub state: String,
    /// Capital city.
    pub city: String,
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lon: f64,
    pub color: MarkerColor,
    pub icon: MarkerIcon,
    /// Popup heading.
    pub title: String,
    /// Drill-down path for this marker.
    pub detail_path: Option<String>,
    /// Current conditions; `null` means "weather data not available".
    pub weather: Option<ApiWeather>,
}

/// Summary of the weather snapshot behind a map response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSnapshotInfo {
    /// Refresh generation.
    pub generation: u64,
    /// When the refresh completed.
    pub fetched_at: DateTime<Utc>,
    /// Number of cities with data.
    pub available: usize,
    /// Cities whose fetch failed.
    pub unavailable: Vec<String>,
}

impl From<&SnapshotSet> for ApiSnapshotInfo {
    fn from(set: &SnapshotSet) -> Self {
        Self {
            generation: set.generation,
            fetched_at: set.fetched_at,
            available: set.available_count(),
            unavailable: set
                .absent_cities()
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}

/// Response for `GET /api/map/{mode}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMap {
    pub mode: ApiMode,
    pub markers: Vec<ApiMarker>,
    /// Present in live weather mode once a refresh has been published.
    pub snapshot: Option<ApiSnapshotInfo>,
}

/// Classifies an error response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorKind {
    /// The requested region or mode does not exist (404).
    NotFound,
    /// A dataset or forecast could not be loaded (502).
    LoadFailed,
}

/// Error body returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Human-readable message.
    pub error: String,
    pub kind: ApiErrorKind,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn weather_carries_code_description_and_icon() {
        let weather = ApiWeather::from(WeatherSnapshot {
            temperature_c: 18.2,
            weather_code: 45,
            wind_speed_kmh: None,
        });

        assert_eq!(weather.description, "Fog");
        assert_eq!(weather.icon, "🌫️");
        assert!(weather.wind_speed_kmh.is_none());
    }

    #[test]
    fn snapshot_info_lists_unavailable_cities() {
        let set = SnapshotSet {
            generation: 4,
            fetched_at: Utc::now(),
            entries: BTreeMap::from([
                ("Leh".to_owned(), None),
                (
                    "Patna".to_owned(),
                    Some(WeatherSnapshot {
                        temperature_c: 38.0,
                        weather_code: 0,
                        wind_speed_kmh: Some(11.2),
                    }),
                ),
            ]),
        };

        let info = ApiSnapshotInfo::from(&set);
        assert_eq!(info.generation, 4);
        assert_eq!(info.available, 1);
        assert_eq!(info.unavailable, vec!["Leh".to_owned()]);
    }

    #[test]
    fn error_kind_is_snake_case() {
        let json = serde_json::to_value(ApiError {
            error: "No landcover entry for 'Atlantis'".to_owned(),
            kind: ApiErrorKind::LoadFailed,
        })
        .unwrap();

        assert_eq!(json["kind"], "load_failed");
    }
}
