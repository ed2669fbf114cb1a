//! Concurrent per-capital weather refresh.
//!
//! [`fetch_all`] issues one request per distinct capital city and waits
//! for all of them to settle. A failed city becomes `None` in the result
//! and never affects any other city.
//!
//! [`WeatherAggregator`] owns the published [`SnapshotSet`]. Every refresh
//! is stamped with a generation number; when a refresh finishes after a
//! newer refresh (or an invalidation) has started, its result is dropped
//! instead of overwriting fresher state.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use futures::future::join_all;
use mausam_map_region_models::CapitalEntry;
use mausam_map_weather_models::{SnapshotSet, WeatherSnapshot};
use tokio::sync::RwLock;

use crate::WeatherProvider;

/// Fetches current conditions for every distinct capital city at once.
///
/// The returned map has exactly one entry per distinct city in
/// `capitals`. Cities sharing a name are requested once, using the first
/// entry's coordinates.
pub async fn fetch_all<P: WeatherProvider>(
    provider: &P,
    capitals: &[CapitalEntry],
) -> BTreeMap<String, Option<WeatherSnapshot>> {
    let mut cities: BTreeMap<&str, (f64, f64)> = BTreeMap::new();
    for capital in capitals {
        cities
            .entry(capital.city.as_str())
            .or_insert((capital.lat, capital.lon));
    }

    log::info!("Fetching current weather for {} capitals", cities.len());

    let requests = cities.into_iter().map(|(city, (lat, lon))| async move {
        (city, provider.current(lat, lon).await)
    });

    join_all(requests)
        .await
        .into_iter()
        .map(|(city, result)| match result {
            Ok(snapshot) => (city.to_owned(), Some(snapshot)),
            Err(e) => {
                log::warn!("Weather unavailable for {city}: {e}");
                (city.to_owned(), None)
            }
        })
        .collect()
}

/// Owns the latest weather snapshot for the map.
#[derive(Debug)]
pub struct WeatherAggregator<P> {
    provider: P,
    generation: AtomicU64,
    current: RwLock<Option<Arc<SnapshotSet>>>,
}

impl<P: WeatherProvider> WeatherAggregator<P> {
    /// Creates an aggregator with no snapshot.
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            generation: AtomicU64::new(0),
            current: RwLock::new(None),
        }
    }

    /// Returns the upstream provider.
    #[must_use]
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Generation of the most recently started refresh or invalidation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Returns the published snapshot, if any.
    pub async fn snapshot(&self) -> Option<Arc<SnapshotSet>> {
        self.current.read().await.clone()
    }

    /// Refreshes weather for every capital and publishes the result.
    ///
    /// Returns the published set, or `None` if a newer refresh or an
    /// invalidation started while this one was in flight (the result is
    /// then discarded).
    pub async fn refresh_all(&self, capitals: &[CapitalEntry]) -> Option<Arc<SnapshotSet>> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        log::debug!("Starting weather refresh generation {generation}");

        let entries = fetch_all(&self.provider, capitals).await;
        let set = Arc::new(SnapshotSet {
            generation,
            fetched_at: Utc::now(),
            entries,
        });

        let mut current = self.current.write().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            log::debug!("Discarding stale weather refresh generation {generation}");
            return None;
        }

        log::info!(
            "Weather refresh generation {generation}: {}/{} capitals available",
            set.available_count(),
            set.entries.len()
        );
        *current = Some(Arc::clone(&set));

        Some(set)
    }

    /// Drops the published snapshot and orphans any refresh in flight.
    ///
    /// Called when the map leaves weather mode.
    pub async fn invalidate(&self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *self.current.write().await = None;
        log::debug!("Weather snapshot invalidated (generation {generation})");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WeatherError;
    use mausam_map_weather_models::DailyForecast;
    use std::time::Duration;

    /// Returns the latitude as the temperature; fails for latitudes in
    /// `failing`; sleeps `delay_ms` before answering.
    #[derive(Default)]
    struct FakeProvider {
        failing: Vec<f64>,
        delay_ms: Arc<AtomicU64>,
    }

    impl WeatherProvider for FakeProvider {
        async fn current(&self, lat: f64, _lon: f64) -> Result<WeatherSnapshot, WeatherError> {
            let delay = self.delay_ms.load(Ordering::SeqCst);
            if delay > 0 {
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
            if self.failing.iter().any(|f| (f - lat).abs() < f64::EPSILON) {
                return Err(WeatherError::Status { status: 503 });
            }
            Ok(WeatherSnapshot {
                temperature_c: lat,
                weather_code: 0,
                wind_speed_kmh: None,
            })
        }

        async fn daily(&self, _lat: f64, _lon: f64) -> Result<Vec<DailyForecast>, WeatherError> {
            Ok(Vec::new())
        }
    }

    fn capitals() -> Vec<CapitalEntry> {
        vec![
            CapitalEntry::new("Tamil Nadu", "Chennai", 13.0827, 80.2707),
            CapitalEntry::new("Himachal Pradesh", "Shimla", 31.1048, 77.1734),
            CapitalEntry::new("Nagaland", "Kohima", 25.6751, 94.1086),
            CapitalEntry::new("Kerala", "Thiruvananthapuram", 8.5241, 76.9366),
        ]
    }

    #[tokio::test]
    async fn one_failure_leaves_every_other_city_intact() {
        let provider = FakeProvider {
            failing: vec![31.1048],
            ..FakeProvider::default()
        };

        let result = fetch_all(&provider, &capitals()).await;

        assert_eq!(result.len(), 4);
        assert_eq!(result.values().filter(|v| v.is_none()).count(), 1);
        assert!(result["Shimla"].is_none());
        for capital in capitals().iter().filter(|c| c.city != "Shimla") {
            let snapshot = result[&capital.city].expect("populated");
            assert!((snapshot.temperature_c - capital.lat).abs() < f64::EPSILON);
        }
    }

    #[tokio::test]
    async fn shared_capital_is_requested_once() {
        let provider = FakeProvider::default();
        let mut list = capitals();
        list.push(CapitalEntry::new("Punjab", "Chandigarh", 30.7333, 76.7794));
        list.push(CapitalEntry::new("Haryana", "Chandigarh", 30.7333, 76.7794));

        let result = fetch_all(&provider, &list).await;

        assert_eq!(result.len(), 5);
        assert!(result["Chandigarh"].is_some());
    }

    #[tokio::test]
    async fn refresh_replaces_previous_snapshot() {
        let aggregator = WeatherAggregator::new(FakeProvider::default());

        let first = aggregator.refresh_all(&capitals()).await.unwrap();
        let second = aggregator.refresh_all(&capitals()[..2]).await.unwrap();

        assert_eq!(first.generation, 1);
        assert_eq!(second.generation, 2);
        let published = aggregator.snapshot().await.unwrap();
        assert!(Arc::ptr_eq(&published, &second));
        assert_eq!(published.entries.len(), 2);
    }

    #[tokio::test]
    async fn stale_refresh_does_not_overwrite_newer_one() {
        let delay = Arc::new(AtomicU64::new(100));
        let aggregator = WeatherAggregator::new(FakeProvider {
            delay_ms: Arc::clone(&delay),
            ..FakeProvider::default()
        });
        let list = capitals();

        let (slow, fast) = tokio::join!(aggregator.refresh_all(&list), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            delay.store(0, Ordering::SeqCst);
            aggregator.refresh_all(&list[..1]).await
        });

        assert!(slow.is_none());
        let fast = fast.unwrap();
        assert_eq!(fast.generation, 2);
        let published = aggregator.snapshot().await.unwrap();
        assert_eq!(published.generation, 2);
        assert_eq!(published.entries.len(), 1);
    }

    #[tokio::test]
    async fn invalidate_discards_in_flight_refresh() {
        let aggregator = WeatherAggregator::new(FakeProvider {
            delay_ms: Arc::new(AtomicU64::new(50)),
            ..FakeProvider::default()
        });
        let list = capitals();

        let (refreshed, ()) = tokio::join!(aggregator.refresh_all(&list), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            aggregator.invalidate().await;
        });

        assert!(refreshed.is_none());
        assert!(aggregator.snapshot().await.is_none());
        assert_eq!(aggregator.generation(), 2);
    }
}
