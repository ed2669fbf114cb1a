#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Capital, mode, and marker styling types for the mausam map.
//!
//! These types describe what the map renders: one point per state or
//! union territory capital, styled according to the active display
//! [`Mode`]. They carry no behavior beyond simple accessors; resolution
//! logic lives in `mausam_map_region`.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A single map point: a state (or UT) and the coordinates of its capital.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapitalEntry {
    /// State or union territory name as displayed (e.g. "Jammu and Kashmir").
    pub state: String,
    /// Capital city name (e.g. "Srinagar").
    pub city: String,
    /// Latitude (WGS84).
    pub lat: f64,
    /// Longitude (WGS84).
    pub lon: f64,
}

impl CapitalEntry {
    /// Creates a new entry.
    #[must_use]
    pub fn new(state: &str, city: &str, lat: f64, lon: f64) -> Self {
        Self {
            state: state.to_owned(),
            city: city.to_owned(),
            lat,
            lon,
        }
    }

    /// Returns a copy of this entry re-labelled for another state.
    ///
    /// Used when two states share one physical capital and each needs
    /// its own marker.
    #[must_use]
    pub fn for_state(&self, state: &str) -> Self {
        Self {
            state: state.to_owned(),
            ..self.clone()
        }
    }
}

/// A named display configuration of the map.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Mode {
    /// Live current conditions at every capital.
    Weather,
    /// Population, literacy, and religion tables.
    Demographics,
    /// Land utilization tables.
    LandCover,
    /// Major infrastructure projects per state.
    Infrastructure,
    /// Recent natural disasters per state.
    PastEvents,
}

impl Mode {
    /// The mode the map opens in. Renders the raw capital registry.
    pub const DEFAULT: Self = Self::Weather;

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Weather,
            Self::Demographics,
            Self::LandCover,
            Self::Infrastructure,
            Self::PastEvents,
        ]
    }

    /// Human-readable label for navigation.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Weather => "Weather",
            Self::Demographics => "Demographics",
            Self::LandCover => "Land Use",
            Self::Infrastructure => "Infrastructure",
            Self::PastEvents => "Past Events",
        }
    }
}

/// Marker color used on the map.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MarkerColor {
    /// Stock map pin color; also the fallback for unknown modes.
    #[default]
    Blue,
    Orange,
    Yellow,
    Violet,
    Red,
}

/// Marker glyph used on the map.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MarkerIcon {
    /// Plain pin.
    #[default]
    Pin,
    Weather,
    People,
    Land,
    Project,
    Hazard,
}

/// Which capital field identifies a region in a drill-down route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailKey {
    /// Route is keyed by the capital city name.
    City,
    /// Route is keyed by the state name.
    State,
}

impl DetailKey {
    /// Template placeholder for this key (`{city}` or `{state}`).
    #[must_use]
    pub const fn placeholder(self) -> &'static str {
        match self {
            Self::City => "{city}",
            Self::State => "{state}",
        }
    }

    /// Picks the identifying value out of a capital entry.
    #[must_use]
    pub fn value_of(self, entry: &CapitalEntry) -> &str {
        match self {
            Self::City => &entry.city,
            Self::State => &entry.state,
        }
    }
}

/// A drill-down route template such as `/weather/{city}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailRoute {
    /// Path template containing exactly one placeholder.
    pub template: String,
    /// Which capital field fills the placeholder.
    pub key: DetailKey,
}

impl DetailRoute {
    /// Builds the `/{mode}/{placeholder}` route for a mode.
    #[must_use]
    pub fn for_mode(mode: Mode, key: DetailKey) -> Self {
        Self {
            template: format!("/{mode}/{}", key.placeholder()),
            key,
        }
    }

    /// Fills the template for a specific capital entry.
    #[must_use]
    pub fn path_for(&self, entry: &CapitalEntry) -> String {
        self.template
            .replace(self.key.placeholder(), self.key.value_of(entry))
    }
}
