//! Drill-down lookups for a single region.
//!
//! Dataset modes join the route identifier against the mode's dataset by
//! normalized region name; the first matching record wins and no fuzzy
//! matching is attempted. Weather mode looks the identifier up as a
//! capital city, reuses that city's entry from the latest snapshot, and
//! fetches the daily forecast.
//!
//! "Not found" and "load failed" are distinct outcomes: callers render the
//! first as a missing region and the second as an upstream failure.

use std::sync::Arc;

use mausam_map_dataset::{DatasetError, DatasetLoad};
use mausam_map_dataset_models::{DatasetId, RegionRecord};
use mausam_map_region_models::{CapitalEntry, Mode};
use mausam_map_weather::aggregator::WeatherAggregator;
use mausam_map_weather::{WeatherError, WeatherProvider};
use mausam_map_weather_models::{DailyForecast, WeatherSnapshot};
use serde::Serialize;
use thiserror::Error;

use crate::mode::dataset_for;
use crate::normalize::normalize;
use crate::registry::CapitalRegistry;
use crate::summary::{LandUseDistribution, ReligionShares};

/// Errors resolving a region detail.
#[derive(Debug, Error)]
pub enum DetailError {
    /// No record or capital matches the identifier.
    #[error("No {mode} entry for '{region}'")]
    NotFound {
        /// Mode that was queried.
        mode: Mode,
        /// Identifier as received.
        region: String,
    },

    /// The backing dataset could not be loaded.
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    /// The forecast could not be fetched.
    #[error(transparent)]
    Weather(#[from] WeatherError),
}

impl DetailError {
    /// Returns `true` if the region simply does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Chart-ready view derived from a tabular record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegionSummary {
    Religion(ReligionShares),
    LandUse(LandUseDistribution),
}

impl RegionSummary {
    fn for_record(dataset: DatasetId, record: &RegionRecord) -> Option<Self> {
        let fields = record.fields()?;
        match dataset {
            DatasetId::Demographics => Some(Self::Religion(ReligionShares::from_fields(fields))),
            DatasetId::LandUse => Some(Self::LandUse(LandUseDistribution::from_fields(fields))),
            DatasetId::Infrastructure | DatasetId::Disasters => None,
        }
    }
}

/// Weather drill-down for one capital.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherDetail {
    pub capital: CapitalEntry,
    /// Entry from the latest snapshot; `None` when the city's fetch
    /// failed or no refresh has completed.
    pub current: Option<WeatherSnapshot>,
    pub forecast: Vec<DailyForecast>,
}

/// The resolved detail for one region.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RegionDetail {
    /// A dataset record.
    Record {
        mode: Mode,
        record: RegionRecord,
        summary: Option<RegionSummary>,
    },
    /// Live weather for a capital.
    Weather(WeatherDetail),
}

/// Resolves drill-down requests against datasets and live weather.
#[derive(Debug)]
pub struct RegionDetailResolver<L, W> {
    registry: Arc<CapitalRegistry>,
    loader: L,
    weather: Arc<WeatherAggregator<W>>,
}

impl<L: DatasetLoad, W: WeatherProvider> RegionDetailResolver<L, W> {
    #[must_use]
    pub const fn new(
        registry: Arc<CapitalRegistry>,
        loader: L,
        weather: Arc<WeatherAggregator<W>>,
    ) -> Self {
        Self {
            registry,
            loader,
            weather,
        }
    }

    /// Resolves `raw` (a city in weather mode, a state otherwise).
    ///
    /// # Errors
    ///
    /// * [`DetailError::NotFound`] if nothing matches the normalized
    ///   identifier
    /// * [`DetailError::Dataset`] if the mode's dataset fails to load
    /// * [`DetailError::Weather`] if the daily forecast fetch fails
    pub async fn resolve(&self, mode: Mode, raw: &str) -> Result<RegionDetail, DetailError> {
        match dataset_for(mode) {
            Some(dataset) => self.resolve_record(mode, dataset, raw).await,
            None => self.resolve_weather(mode, raw).await,
        }
    }

    async fn resolve_record(
        &self,
        mode: Mode,
        dataset: DatasetId,
        raw: &str,
    ) -> Result<RegionDetail, DetailError> {
        let key = normalize(raw);
        let not_found = || DetailError::NotFound {
            mode,
            region: raw.to_owned(),
        };
        if key.is_empty() {
            return Err(not_found());
        }

        let loaded = self.loader.load(dataset).await?;
        let record = loaded
            .records
            .iter()
            .find(|r| normalize(&r.region) == key)
            .cloned()
            .ok_or_else(not_found)?;

        log::debug!("{mode}: '{raw}' matched record '{}'", record.region);
        let summary = RegionSummary::for_record(dataset, &record);

        Ok(RegionDetail::Record {
            mode,
            record,
            summary,
        })
    }

    async fn resolve_weather(&self, mode: Mode, raw: &str) -> Result<RegionDetail, DetailError> {
        let capital = self
            .registry
            .find_city(raw)
            .cloned()
            .ok_or_else(|| DetailError::NotFound {
                mode,
                region: raw.to_owned(),
            })?;

        let current = self
            .weather
            .snapshot()
            .await
            .and_then(|set| set.get(&capital.city).copied());
        if current.is_none() {
            log::debug!("No current conditions for {}", capital.city);
        }

        let forecast = self
            .weather
            .provider()
            .daily(capital.lat, capital.lon)
            .await?;

        Ok(RegionDetail::Weather(WeatherDetail {
            capital,
            current,
            forecast,
        }))
    }
}
