//! Whole-dataset cache layered over any [`DatasetLoad`].
//!
//! Parsed datasets are stored as `Arc<LoadedDataset>` and swapped in as a
//! unit; a cached dataset is never modified in place. Failed loads are not
//! cached, so the next request retries the underlying loader.

use std::collections::BTreeMap;
use std::sync::Arc;

use mausam_map_dataset_models::{DatasetId, LoadedDataset};
use tokio::sync::RwLock;

use crate::{DatasetError, DatasetLoad};

/// Caches successfully loaded datasets from an inner loader.
#[derive(Debug)]
pub struct CachedLoader<L> {
    inner: L,
    entries: RwLock<BTreeMap<DatasetId, Arc<LoadedDataset>>>,
}

impl<L: DatasetLoad> CachedLoader<L> {
    /// Wraps `inner` with an empty cache.
    #[must_use]
    pub fn new(inner: L) -> Self {
        Self {
            inner,
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    /// Returns the wrapped loader.
    #[must_use]
    pub const fn inner(&self) -> &L {
        &self.inner
    }

    /// Drops every cached dataset.
    pub async fn invalidate(&self) {
        self.entries.write().await.clear();
        log::debug!("Dataset cache cleared");
    }
}

impl<L: DatasetLoad> DatasetLoad for CachedLoader<L> {
    async fn load(&self, id: DatasetId) -> Result<Arc<LoadedDataset>, DatasetError> {
        if let Some(hit) = self.entries.read().await.get(&id) {
            log::debug!("{id}: served from cache");
            return Ok(Arc::clone(hit));
        }

        let dataset = self.inner.load(id).await?;
        self.entries.write().await.insert(id, Arc::clone(&dataset));

        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts loads; fails every load of `LandUse`.
    #[derive(Default)]
    struct CountingLoader {
        calls: AtomicUsize,
    }

    impl DatasetLoad for CountingLoader {
        async fn load(&self, id: DatasetId) -> Result<Arc<LoadedDataset>, DatasetError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if id == DatasetId::LandUse {
                return Err(DatasetError::Fetch {
                    id,
                    message: "connection reset".to_owned(),
                });
            }
            Ok(Arc::new(LoadedDataset {
                id,
                records: Vec::new(),
            }))
        }
    }

    #[tokio::test]
    async fn second_load_is_served_from_cache() {
        let cache = CachedLoader::new(CountingLoader::default());

        let first = cache.load(DatasetId::Demographics).await.unwrap();
        let second = cache.load(DatasetId::Demographics).await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.inner().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let cache = CachedLoader::new(CountingLoader::default());

        assert!(cache.load(DatasetId::LandUse).await.is_err());
        assert!(cache.load(DatasetId::LandUse).await.is_err());

        assert_eq!(cache.inner().calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn invalidate_forces_a_reload() {
        let cache = CachedLoader::new(CountingLoader::default());

        let first = cache.load(DatasetId::Disasters).await.unwrap();
        cache.invalidate().await;
        let second = cache.load(DatasetId::Disasters).await.unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(cache.inner().calls.load(Ordering::SeqCst), 2);
    }
}
