//! Server configuration read from the environment at startup.
//!
//! A directory data source must hold the four dataset files side by side:
//!
//! ```text
//! <MAUSAM_DATA_DIR>/
//!     demographicData.csv
//!     land_use.csv
//!     infraData.json
//!     disasters.json
//! ```
//!
//! `packages/dataset/fixtures` has that layout. Missing files are logged
//! at startup and surface as load failures when their mode is opened.

use std::path::PathBuf;
use std::time::Duration;

use mausam_map_dataset::loader::DatasetSource;
use mausam_map_weather::open_meteo::DEFAULT_BASE_URL;

/// Everything the server needs to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalConfig {
    /// Address to bind (`BIND_ADDR`, default `127.0.0.1`).
    pub bind_addr: String,
    /// Port to bind (`PORT`, default `8080`).
    pub port: u16,
    /// Where dataset files are read from. `MAUSAM_DATA_URL` selects an
    /// HTTP source; otherwise `MAUSAM_DATA_DIR` (default `data`, relative
    /// to the working directory).
    pub dataset_source: DatasetSource,
    /// Forecast endpoint (`MAUSAM_WEATHER_URL`).
    pub weather_url: String,
    /// Timeout for every upstream request (`MAUSAM_WEATHER_TIMEOUT_SECS`,
    /// default 10).
    pub request_timeout: Duration,
    /// Keep parsed datasets between requests (`MAUSAM_CACHE_DATASETS`,
    /// default `true`).
    pub cache_datasets: bool,
}

impl PortalConfig {
    /// Reads the configuration from process environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`. Unset or unparsable
    /// values fall back to their defaults.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = parse_or("PORT", lookup("PORT"), 8080);

        let dataset_source = match lookup("MAUSAM_DATA_URL").filter(|url| !url.trim().is_empty()) {
            Some(url) => DatasetSource::http(url.trim()),
            None => DatasetSource::Directory(PathBuf::from(
                lookup("MAUSAM_DATA_DIR").unwrap_or_else(|| "data".to_string()),
            )),
        };

        let weather_url =
            lookup("MAUSAM_WEATHER_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let timeout_secs = parse_or(
            "MAUSAM_WEATHER_TIMEOUT_SECS",
            lookup("MAUSAM_WEATHER_TIMEOUT_SECS"),
            10,
        );
        let cache_datasets = parse_or(
            "MAUSAM_CACHE_DATASETS",
            lookup("MAUSAM_CACHE_DATASETS"),
            true,
        );

        Self {
            bind_addr,
            port,
            dataset_source,
            weather_url,
            request_timeout: Duration::from_secs(timeout_secs),
            cache_datasets,
        }
    }
}

fn parse_or<T: std::str::FromStr + std::fmt::Display>(key: &str, raw: Option<String>, default: T) -> T {
    let Some(raw) = raw else {
        return default;
    };
    raw.trim().parse().unwrap_or_else(|_| {
        log::warn!("Ignoring invalid {key}='{raw}', using {default}");
        default
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn config(vars: &[(&str, &str)]) -> PortalConfig {
        let vars: BTreeMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        PortalConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = config(&[]);

        assert_eq!(config.bind_addr, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(
            config.dataset_source,
            DatasetSource::Directory(PathBuf::from("data"))
        );
        assert_eq!(config.weather_url, DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert!(config.cache_datasets);
    }

    #[test]
    fn data_url_takes_precedence_over_directory() {
        let config = config(&[
            ("MAUSAM_DATA_URL", "https://static.example.org/data/"),
            ("MAUSAM_DATA_DIR", "/srv/data"),
        ]);

        assert_eq!(
            config.dataset_source,
            DatasetSource::http("https://static.example.org/data")
        );
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let config = config(&[
            ("PORT", "eighty"),
            ("MAUSAM_WEATHER_TIMEOUT_SECS", "-1"),
            ("MAUSAM_CACHE_DATASETS", "false"),
        ]);

        assert_eq!(config.port, 8080);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert!(!config.cache_datasets);
    }
}
