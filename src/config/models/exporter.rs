//! Exporter configuration: metric naming and refresh schedule

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Exporter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExporterConfig {
    /// Prefix for every metric name
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Value of the `environment` constant label
    #[serde(default)]
    pub environment: String,
    /// Value of the `deployment` constant label
    #[serde(default)]
    pub deployment: String,
    /// Seconds between refresh cycles
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    /// Organizations processed at once
    #[serde(default = "default_concurrency")]
    pub org_concurrency: usize,
    /// Spaces processed at once within one organization
    #[serde(default = "default_concurrency")]
    pub space_concurrency: usize,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            environment: String::new(),
            deployment: String::new(),
            refresh_interval_secs: default_refresh_interval_secs(),
            org_concurrency: default_concurrency(),
            space_concurrency: default_concurrency(),
        }
    }
}

impl ExporterConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}
