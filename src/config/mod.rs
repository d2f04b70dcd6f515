//! Configuration management for the exporter
//!
//! Configuration is read from a YAML file, then overridden by `CF_EXPORTER_*`
//! environment variables, then by command line flags, and validated once.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{ExporterError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

/// Prefix shared by every environment override
pub const ENV_PREFIX: &str = "CF_EXPORTER_";

/// Main configuration struct for the exporter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub exporter: ExporterConfig,
    #[serde(default)]
    pub cf: CfConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file without validating it
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path).await?;

        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(content)?;
        debug!("Configuration parsed successfully");
        Ok(config)
    }

    /// Build configuration from defaults and the process environment
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let mut config = Self::default();
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Override fields from `CF_EXPORTER_*` variables resolved through `lookup`
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));

        if let Some(v) = var("HOST") {
            self.server.host = v;
        }
        if let Some(v) = var("PORT") {
            self.server.port = parse_env("PORT", &v)?;
        }
        if let Some(v) = var("METRICS_PATH") {
            self.server.metrics_path = v;
        }

        if let Some(v) = var("NAMESPACE") {
            self.exporter.namespace = v;
        }
        if let Some(v) = var("ENVIRONMENT") {
            self.exporter.environment = v;
        }
        if let Some(v) = var("DEPLOYMENT") {
            self.exporter.deployment = v;
        }
        if let Some(v) = var("REFRESH_INTERVAL_SECS") {
            self.exporter.refresh_interval_secs = parse_env("REFRESH_INTERVAL_SECS", &v)?;
        }
        if let Some(v) = var("ORG_CONCURRENCY") {
            self.exporter.org_concurrency = parse_env("ORG_CONCURRENCY", &v)?;
        }
        if let Some(v) = var("SPACE_CONCURRENCY") {
            self.exporter.space_concurrency = parse_env("SPACE_CONCURRENCY", &v)?;
        }

        if let Some(v) = var("CF_API_URL") {
            self.cf.api_url = v;
        }
        if let Some(v) = var("CF_USERNAME") {
            self.cf.username = Some(v);
        }
        if let Some(v) = var("CF_PASSWORD") {
            self.cf.password = Some(v);
        }
        if let Some(v) = var("CF_CLIENT_ID") {
            self.cf.client_id = Some(v);
        }
        if let Some(v) = var("CF_CLIENT_SECRET") {
            self.cf.client_secret = Some(v);
        }
        if let Some(v) = var("CF_SKIP_SSL_VALIDATION") {
            self.cf.skip_ssl_validation = parse_env("CF_SKIP_SSL_VALIDATION", &v)?;
        }
        if let Some(v) = var("CF_TIMEOUT_SECS") {
            self.cf.timeout_secs = parse_env("CF_TIMEOUT_SECS", &v)?;
        }

        if let Some(v) = var("LOG_LEVEL") {
            self.logging.level = v;
        }
        if let Some(v) = var("LOG_FORMAT") {
            self.logging.format = v.parse().map_err(ExporterError::Config)?;
        }

        Ok(())
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.server
            .validate()
            .map_err(|e| ExporterError::Config(format!("Server config error: {}", e)))?;
        self.exporter
            .validate()
            .map_err(|e| ExporterError::Config(format!("Exporter config error: {}", e)))?;
        self.cf
            .validate()
            .map_err(|e| ExporterError::Config(format!("Cloud Foundry config error: {}", e)))?;
        self.logging
            .validate()
            .map_err(|e| ExporterError::Config(format!("Logging config error: {}", e)))?;

        debug!("Configuration validation completed");
        Ok(())
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

fn parse_env<T: FromStr>(name: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e| {
        ExporterError::Config(format!(
            "Invalid value '{}' for {}{}: {}",
            value, ENV_PREFIX, name, e
        ))
    })
}
