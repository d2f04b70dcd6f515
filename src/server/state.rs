//! Application state shared across HTTP handlers

use crate::collectors::applications::SnapshotStore;
use crate::config::Config;
use prometheus::Registry;
use std::sync::Arc;
use std::time::Instant;

/// HTTP server state shared across handlers
///
/// Cloning is cheap: the registry and the snapshot store are handles onto
/// shared data.
#[derive(Clone)]
pub struct AppState {
    /// Exporter configuration (shared read-only)
    pub config: Arc<Config>,
    /// Registry gathered by the metrics endpoint
    pub registry: Registry,
    /// Current application snapshot, read by `/health`
    pub store: SnapshotStore,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: Config, registry: Registry, store: SnapshotStore) -> Self {
        Self {
            config: Arc::new(config),
            registry,
            store,
            started_at: Instant::now(),
        }
    }

    pub fn metrics_path(&self) -> &str {
        &self.config.server.metrics_path
    }
}
