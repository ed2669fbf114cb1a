//! Per-mode map configuration.
//!
//! This is the only place that branches on [`Mode`]: everything else
//! reads the resulting [`ModeDescriptor`].

use std::sync::Arc;

use mausam_map_dataset_models::DatasetId;
use mausam_map_region_models::{
    CapitalEntry, DetailKey, DetailRoute, MarkerColor, MarkerIcon, Mode,
};

use crate::registry::CapitalRegistry;

/// Everything the map needs to render one mode.
#[derive(Debug, Clone, PartialEq)]
pub struct ModeDescriptor {
    /// Resolved mode; `None` for an unrecognized mode name.
    pub mode: Option<Mode>,
    /// Mode name as used in routes.
    pub name: String,
    /// Navigation label.
    pub label: String,
    /// Capitals to place markers at.
    pub capitals: Vec<CapitalEntry>,
    pub marker_color: MarkerColor,
    pub marker_icon: MarkerIcon,
    /// Drill-down route, if the mode has a detail view.
    pub detail_route: Option<DetailRoute>,
    /// Backing dataset, if the mode is dataset driven.
    pub dataset: Option<DatasetId>,
    /// Whether markers carry live weather.
    pub uses_live_weather: bool,
}

/// Dataset backing a mode. Weather mode is served live instead.
#[must_use]
pub const fn dataset_for(mode: Mode) -> Option<DatasetId> {
    match mode {
        Mode::Weather => None,
        Mode::Demographics => Some(DatasetId::Demographics),
        Mode::LandCover => Some(DatasetId::LandUse),
        Mode::Infrastructure => Some(DatasetId::Infrastructure),
        Mode::PastEvents => Some(DatasetId::Disasters),
    }
}

/// Marker styling for a mode.
#[must_use]
pub const fn style_for(mode: Mode) -> (MarkerColor, MarkerIcon) {
    match mode {
        Mode::Weather => (MarkerColor::Blue, MarkerIcon::Weather),
        Mode::Demographics => (MarkerColor::Orange, MarkerIcon::People),
        Mode::LandCover => (MarkerColor::Yellow, MarkerIcon::Land),
        Mode::Infrastructure => (MarkerColor::Violet, MarkerIcon::Project),
        Mode::PastEvents => (MarkerColor::Red, MarkerIcon::Hazard),
    }
}

/// Which capital field keys a mode's drill-down route.
#[must_use]
pub const fn detail_key_for(mode: Mode) -> DetailKey {
    match mode {
        Mode::Weather => DetailKey::City,
        Mode::Demographics | Mode::LandCover | Mode::Infrastructure | Mode::PastEvents => {
            DetailKey::State
        }
    }
}

/// Turns mode names into descriptors against a capital registry.
#[derive(Debug, Clone)]
pub struct ModeResolver {
    registry: Arc<CapitalRegistry>,
}

impl ModeResolver {
    #[must_use]
    pub const fn new(registry: Arc<CapitalRegistry>) -> Self {
        Self { registry }
    }

    /// The registry capitals are drawn from.
    #[must_use]
    pub fn registry(&self) -> &CapitalRegistry {
        &self.registry
    }

    /// Resolves a mode name.
    ///
    /// Unknown names fall back to the stock pin, the unfiltered registry,
    /// no drill-down, and no live weather.
    #[must_use]
    pub fn resolve(&self, name: &str) -> ModeDescriptor {
        match name.trim().parse::<Mode>() {
            Ok(mode) => self.describe(mode),
            Err(_) => {
                log::debug!("Unknown mode '{name}', using fallback styling");
                let name = name.trim().to_lowercase();
                ModeDescriptor {
                    mode: None,
                    label: name.clone(),
                    name,
                    capitals: self.registry.all().to_vec(),
                    marker_color: MarkerColor::default(),
                    marker_icon: MarkerIcon::default(),
                    detail_route: None,
                    dataset: None,
                    uses_live_weather: false,
                }
            }
        }
    }

    /// Builds the descriptor for a known mode.
    #[must_use]
    pub fn describe(&self, mode: Mode) -> ModeDescriptor {
        let (marker_color, marker_icon) = style_for(mode);

        ModeDescriptor {
            mode: Some(mode),
            name: mode.to_string(),
            label: mode.label().to_owned(),
            capitals: self.registry.for_mode(mode),
            marker_color,
            marker_icon,
            detail_route: Some(DetailRoute::for_mode(mode, detail_key_for(mode))),
            dataset: dataset_for(mode),
            uses_live_weather: mode == Mode::Weather,
        }
    }

    /// Descriptors for every known mode, in navigation order.
    #[must_use]
    pub fn all(&self) -> Vec<ModeDescriptor> {
        Mode::all().iter().map(|mode| self.describe(*mode)).collect()
    }
}
