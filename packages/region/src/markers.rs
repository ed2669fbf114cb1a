//! Map markers for a resolved mode.

use mausam_map_region_models::{MarkerColor, MarkerIcon};
use mausam_map_weather_models::{SnapshotSet, WeatherSnapshot};
use serde::Serialize;

use crate::mode::ModeDescriptor;

/// One point on the map, ready to render.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapMarker {
    pub state: String,
    pub city: String,
    pub lat: f64,
    pub lon: f64,
    pub color: MarkerColor,
    pub icon: MarkerIcon,
    /// Popup heading: the city in live weather mode, the state otherwise.
    pub title: String,
    /// Filled-in drill-down path, if the mode has one.
    pub detail_path: Option<String>,
    /// Current conditions; `None` when weather data is not available or
    /// the mode does not show weather.
    pub weather: Option<WeatherSnapshot>,
}

/// Builds one marker per capital of the descriptor.
///
/// In live weather mode each marker picks its city's entry out of
/// `snapshot`; a city missing from the snapshot (or no snapshot at all)
/// renders without weather rather than failing.
#[must_use]
pub fn build_markers(descriptor: &ModeDescriptor, snapshot: Option<&SnapshotSet>) -> Vec<MapMarker> {
    descriptor
        .capitals
        .iter()
        .map(|capital| {
            let (title, weather) = if descriptor.uses_live_weather {
                (
                    capital.city.clone(),
                    snapshot.and_then(|s| s.get(&capital.city)).copied(),
                )
            } else {
                (capital.state.clone(), None)
            };

            MapMarker {
                state: capital.state.clone(),
                city: capital.city.clone(),
                lat: capital.lat,
                lon: capital.lon,
                color: descriptor.marker_color,
                icon: descriptor.marker_icon,
                title,
                detail_path: descriptor
                    .detail_route
                    .as_ref()
                    .map(|route| route.path_for(capital)),
                weather,
            }
        })
        .collect()
}
