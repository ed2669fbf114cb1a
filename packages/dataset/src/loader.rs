//! Reads dataset files from a directory or an HTTP base URL.
//!
//! Every call to [`DatasetLoader::load`] fetches and parses the file
//! afresh; wrap the loader in [`crate::cache::CachedLoader`] to keep
//! parsed datasets between calls.

use std::path::PathBuf;
use std::sync::Arc;

use mausam_map_dataset_models::{DatasetDefinition, DatasetId, LoadedDataset};

use crate::{DatasetError, DatasetLoad, parse, registry};

/// Where dataset files live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    /// Files on the local filesystem under this directory.
    Directory(PathBuf),
    /// Files served under this base URL (e.g. the portal's static host).
    Http {
        /// Base URL without a trailing slash.
        base_url: String,
    },
}

impl DatasetSource {
    /// Creates an HTTP source, dropping any trailing slash.
    #[must_use]
    pub fn http(base_url: &str) -> Self {
        Self::Http {
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    /// Human-readable location of a dataset file, for logs.
    #[must_use]
    pub fn location_of(&self, file: &str) -> String {
        match self {
            Self::Directory(root) => root.join(file).display().to_string(),
            Self::Http { base_url } => format!("{base_url}/{file}"),
        }
    }

    /// Lists the dataset files missing from a directory source.
    ///
    /// Always empty for an HTTP source, whose files are only checked
    /// when fetched.
    pub async fn missing_files(&self) -> Vec<String> {
        let Self::Directory(root) = self else {
            return Vec::new();
        };

        let mut missing = Vec::new();
        for def in registry::all_definitions() {
            if !tokio::fs::try_exists(root.join(&def.file))
                .await
                .unwrap_or(false)
            {
                missing.push(def.file);
            }
        }
        missing
    }
}

/// Loads datasets from a [`DatasetSource`] using the embedded definitions.
#[derive(Debug, Clone)]
pub struct DatasetLoader {
    source: DatasetSource,
    client: reqwest::Client,
}

impl DatasetLoader {
    /// Creates a loader for the given source.
    #[must_use]
    pub fn new(source: DatasetSource, client: reqwest::Client) -> Self {
        Self { source, client }
    }

    /// Retrieves the raw bytes of a dataset file.
    async fn fetch_bytes(&self, def: &DatasetDefinition) -> Result<Vec<u8>, DatasetError> {
        let fetch_error = |message: String| DatasetError::Fetch {
            id: def.id,
            message,
        };

        match &self.source {
            DatasetSource::Directory(root) => {
                let path = root.join(&def.file);
                tokio::fs::read(&path)
                    .await
                    .map_err(|e| fetch_error(format!("{}: {e}", path.display())))
            }
            DatasetSource::Http { base_url } => {
                let url = format!("{base_url}/{}", def.file);
                let resp = self
                    .client
                    .get(&url)
                    .send()
                    .await
                    .map_err(|e| fetch_error(format!("{url}: {e}")))?;
                if !resp.status().is_success() {
                    return Err(fetch_error(format!(
                        "{url}: request failed with status {}",
                        resp.status()
                    )));
                }
                resp.bytes()
                    .await
                    .map(|bytes| bytes.to_vec())
                    .map_err(|e| fetch_error(format!("{url}: {e}")))
            }
        }
    }
}

/// Decodes a fetched file as UTF-8. The bytes arrived, so a bad
/// encoding is a malformed document.
fn decode(id: DatasetId, bytes: Vec<u8>) -> Result<String, DatasetError> {
    String::from_utf8(bytes).map_err(|e| DatasetError::Parse {
        id,
        message: format!("file is not valid UTF-8: {e}"),
    })
}

impl DatasetLoad for DatasetLoader {
    async fn load(&self, id: DatasetId) -> Result<Arc<LoadedDataset>, DatasetError> {
        let def = registry::definition(id);
        log::info!(
            "Loading dataset {id} ({}) from {}",
            def.name,
            self.source.location_of(&def.file)
        );

        let text = decode(id, self.fetch_bytes(&def).await?)?;
        let dataset = parse::parse_dataset(&def, &text)?;

        log::info!("{id}: loaded {} records", dataset.records.len());

        Ok(Arc::new(dataset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mausam_map_dataset_models::RecordData;

    fn fixtures() -> DatasetLoader {
        DatasetLoader::new(
            DatasetSource::Directory(PathBuf::from(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/fixtures"
            ))),
            reqwest::Client::new(),
        )
    }

    #[tokio::test]
    async fn loads_every_fixture_dataset() {
        let loader = fixtures();
        for id in DatasetId::all() {
            let dataset = loader.load(*id).await.unwrap();
            assert_eq!(dataset.id, *id);
            assert!(!dataset.records.is_empty(), "{id} fixture has no records");
        }
    }

    #[tokio::test]
    async fn land_use_fixture_has_one_record_per_state() {
        let dataset = fixtures().load(DatasetId::LandUse).await.unwrap();

        let punjab_rows = dataset
            .records
            .iter()
            .filter(|r| r.region == "Punjab")
            .count();
        assert_eq!(punjab_rows, 1);
    }

    #[tokio::test]
    async fn disasters_fixture_keeps_event_lists() {
        let dataset = fixtures().load(DatasetId::Disasters).await.unwrap();
        let kerala = dataset
            .records
            .iter()
            .find(|r| r.region == "Kerala")
            .unwrap();

        assert!(matches!(&kerala.data, RecordData::Disasters(events) if !events.is_empty()));
    }

    #[tokio::test]
    async fn missing_directory_is_a_fetch_error() {
        let loader = DatasetLoader::new(
            DatasetSource::Directory(PathBuf::from("/nonexistent/mausam-map-data")),
            reqwest::Client::new(),
        );

        let err = loader.load(DatasetId::Demographics).await.unwrap_err();
        assert!(matches!(
            err,
            DatasetError::Fetch {
                id: DatasetId::Demographics,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn non_utf8_file_is_a_parse_error() {
        let dir = std::env::temp_dir().join(format!("mausam-map-non-utf8-{}", std::process::id()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        tokio::fs::write(dir.join("demographicData.csv"), b"States/Uts\nKer\xe9la\xff\n")
            .await
            .unwrap();
        let loader = DatasetLoader::new(DatasetSource::Directory(dir.clone()), reqwest::Client::new());

        let err = loader.load(DatasetId::Demographics).await.unwrap_err();
        tokio::fs::remove_dir_all(&dir).await.unwrap();

        assert!(matches!(
            err,
            DatasetError::Parse {
                id: DatasetId::Demographics,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn reports_missing_files_of_a_directory_source() {
        let fixtures = DatasetSource::Directory(PathBuf::from(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/fixtures"
        )));
        assert!(fixtures.missing_files().await.is_empty());

        let empty = DatasetSource::Directory(PathBuf::from("/nonexistent/mausam-map-data"));
        let mut missing = empty.missing_files().await;
        missing.sort();
        assert_eq!(
            missing,
            vec!["demographicData.csv", "disasters.json", "infraData.json", "land_use.csv"]
        );

        let http = DatasetSource::http("https://maps.example.org/data");
        assert!(http.missing_files().await.is_empty());
    }

    #[test]
    fn http_source_trims_trailing_slash() {
        let source = DatasetSource::http("https://maps.example.org/data/");
        assert_eq!(
            source.location_of("land_use.csv"),
            "https://maps.example.org/data/land_use.csv"
        );
    }
}
