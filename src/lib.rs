//! # cf-applications-exporter
//!
//! Prometheus exporter for the application inventory of a Cloud Foundry
//! foundation: desired and running instances, memory, disk quota, stack,
//! state and buildpacks of every application.
//!
//! The inventory is rebuilt in the background on a fixed interval by walking
//! organizations, their spaces and each space summary. Scrapes are served from
//! the last published snapshot and never call the Cloud Foundry API.
//!
//! ```rust,no_run
//! use cf_applications_exporter::{Config, Exporter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/cf-exporter.yaml").await?;
//!     config.validate()?;
//!     Exporter::new(config)?.run().await?;
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod cf;
pub mod cli;
pub mod collectors;
pub mod config;
pub mod server;
pub mod utils;

pub use cf::{CloudFoundryClient, PlatformApi};
pub use collectors::applications::{ApplicationsCollector, Refresher, Snapshot, SnapshotStore};
pub use config::Config;
pub use utils::error::{ExporterError, Result};

use prometheus::Registry;
use std::sync::Arc;
use tracing::{debug, info};

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// The assembled exporter: refresher, collector and HTTP server
pub struct Exporter {
    config: Config,
    store: SnapshotStore,
    registry: Registry,
    refresher: Refresher,
    server: server::HttpServer,
}

impl Exporter {
    /// Wire the exporter against the Cloud Foundry API named in `config`
    pub fn new(config: Config) -> Result<Self> {
        let client = CloudFoundryClient::new(&config.cf)?;
        info!("Using Cloud Foundry API at {}", client.api_url());
        Self::with_api(config, Arc::new(client))
    }

    /// Wire the exporter against any [`PlatformApi`] implementation
    pub fn with_api(config: Config, api: Arc<dyn PlatformApi>) -> Result<Self> {
        let store = SnapshotStore::new();
        let registry = Registry::new();

        let collector = ApplicationsCollector::from_config(&config.exporter, store.clone())?;
        registry.register(Box::new(collector))?;

        let refresher = Refresher::from_config(api, store.clone(), &config.exporter);
        let state = server::AppState::new(config.clone(), registry.clone(), store.clone());
        let server = server::HttpServer::new(&config.server, state);

        Ok(Self {
            config,
            store,
            registry,
            refresher,
            server,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Start refreshing and serve until shutdown
    pub async fn run(self) -> Result<()> {
        info!(
            "Starting {} {} (environment={:?}, deployment={:?})",
            NAME, VERSION, self.config.exporter.environment, self.config.exporter.deployment
        );
        debug!("Configuration: {:#?}", self.config.exporter);

        let refresher = self.refresher.spawn();
        let result = self.server.start().await;

        refresher.abort();
        info!("Exporter stopped");
        result
    }
}
