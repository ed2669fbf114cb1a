#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the mausam map.
//!
//! Serves the map markers for each display mode, refreshing live weather
//! for every capital when the map enters weather mode, and the per-region
//! drill-down backed by the static datasets or the daily forecast.

pub mod config;
mod handlers;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use mausam_map_dataset::cache::CachedLoader;
use mausam_map_dataset::loader::DatasetLoader;
use mausam_map_dataset::{DatasetError, DatasetLoad};
use mausam_map_dataset_models::{DatasetId, LoadedDataset};
use mausam_map_region::detail::RegionDetailResolver;
use mausam_map_region::mode::ModeResolver;
use mausam_map_region::registry::CapitalRegistry;
use mausam_map_weather::aggregator::WeatherAggregator;
use mausam_map_weather::open_meteo::OpenMeteoClient;
use thiserror::Error;

use crate::config::PortalConfig;

/// Errors that stop the server from starting or running.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Binding or serving failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The upstream HTTP client could not be built.
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Dataset loader selected by `MAUSAM_CACHE_DATASETS`.
#[derive(Debug)]
pub enum PortalLoader {
    /// Parsed datasets are kept between requests.
    Cached(CachedLoader<DatasetLoader>),
    /// Every request reads the dataset afresh.
    Direct(DatasetLoader),
}

impl DatasetLoad for PortalLoader {
    async fn load(&self, id: DatasetId) -> Result<Arc<LoadedDataset>, DatasetError> {
        match self {
            Self::Cached(loader) => loader.load(id).await,
            Self::Direct(loader) => loader.load(id).await,
        }
    }
}

/// Shared application state.
pub struct AppState {
    /// Mode name to map configuration.
    pub modes: ModeResolver,
    /// Live weather for the capitals; one snapshot for the whole map.
    pub weather: Arc<WeatherAggregator<OpenMeteoClient>>,
    /// Region drill-downs.
    pub details: RegionDetailResolver<PortalLoader, OpenMeteoClient>,
}

impl AppState {
    /// Builds the state for `config` using the embedded capital registry.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Client`] if the HTTP client cannot be built.
    pub fn from_config(config: &PortalConfig) -> Result<Self, ServerError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        let registry = Arc::new(CapitalRegistry::india());
        let weather = Arc::new(WeatherAggregator::new(OpenMeteoClient::new(
            client.clone(),
            &config.weather_url,
        )));

        let loader = DatasetLoader::new(config.dataset_source.clone(), client);
        let loader = if config.cache_datasets {
            PortalLoader::Cached(CachedLoader::new(loader))
        } else {
            PortalLoader::Direct(loader)
        };

        Ok(Self {
            modes: ModeResolver::new(Arc::clone(&registry)),
            details: RegionDetailResolver::new(registry, loader, Arc::clone(&weather)),
            weather,
        })
    }
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/modes", web::get().to(handlers::modes))
            .route("/map/{mode}", web::get().to(handlers::map))
            .route("/detail/{mode}/{region}", web::get().to(handlers::detail)),
    );
}

/// Starts the mausam map API server.
///
/// Reads [`PortalConfig`] from the environment, builds the shared state,
/// and runs the Actix-Web HTTP server. The caller is responsible for
/// providing the async runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns [`ServerError`] if the HTTP client cannot be built or the
/// server fails to bind or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> Result<(), ServerError> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let config = PortalConfig::from_env();
    log::info!(
        "Datasets from {}, weather from {}",
        config.dataset_source.location_of(""),
        config.weather_url
    );

    let missing = config.dataset_source.missing_files().await;
    if !missing.is_empty() {
        log::warn!(
            "Dataset files not found under {}: {}",
            config.dataset_source.location_of(""),
            missing.join(", ")
        );
    }

    let state = web::Data::new(AppState::from_config(&config)?);

    log::info!("Starting server on {}:{}", config.bind_addr, config.port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((config.bind_addr.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
