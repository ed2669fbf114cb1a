#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Static per-state dataset loading, parsing, and caching.
//!
//! Each dataset is described by a TOML definition embedded at compile
//! time ([`registry`]). A [`loader::DatasetLoader`] reads the file from a
//! local directory or an HTTP base URL and hands the text to [`parse`],
//! which turns it into an ordered list of region records. Loads are
//! independent of each other; [`cache::CachedLoader`] optionally keeps
//! whole parsed datasets around between detail requests.

pub mod cache;
pub mod loader;
pub mod parse;
pub mod registry;

use mausam_map_dataset_models::{DatasetId, LoadedDataset};
use thiserror::Error;

/// Errors that can occur while loading a dataset.
///
/// The two variants are disjoint: `Fetch` means the bytes
/// never arrived, `Parse` means they arrived but were not a valid
/// document. Neither is used for "region not found".
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Reading or downloading the dataset failed.
    #[error("Failed to fetch dataset {id}: {message}")]
    Fetch {
        /// Dataset that failed.
        id: DatasetId,
        /// Description of the failure.
        message: String,
    },

    /// The dataset was retrieved but is not a well-formed document.
    #[error("Failed to parse dataset {id}: {message}")]
    Parse {
        /// Dataset that failed.
        id: DatasetId,
        /// Description of the failure.
        message: String,
    },
}

/// Something that can produce a parsed dataset on demand.
///
/// Implemented by [`loader::DatasetLoader`] and [`cache::CachedLoader`];
/// tests provide in-memory implementations.
pub trait DatasetLoad: Send + Sync {
    /// Loads and parses the dataset.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Fetch`] if the dataset cannot be retrieved
    /// and [`DatasetError::Parse`] if it is malformed.
    fn load(
        &self,
        id: DatasetId,
    ) -> impl std::future::Future<Output = Result<std::sync::Arc<LoadedDataset>, DatasetError>> + Send;
}
