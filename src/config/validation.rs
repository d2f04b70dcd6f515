//! Configuration validation

use super::models::*;
use tracing::debug;
use url::Url;

/// Validation trait for configuration structures
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating server configuration");

        if self.host.is_empty() {
            return Err("Host cannot be empty".to_string());
        }

        if self.port == 0 {
            return Err("Port cannot be 0".to_string());
        }

        if !self.metrics_path.starts_with('/') {
            return Err("Metrics path must start with '/'".to_string());
        }

        if self.metrics_path == "/" || self.metrics_path == "/health" {
            return Err(format!(
                "Metrics path '{}' collides with a built-in route",
                self.metrics_path
            ));
        }

        Ok(())
    }
}

impl Validate for ExporterConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating exporter configuration");

        if !is_valid_metric_prefix(&self.namespace) {
            return Err(format!(
                "Namespace '{}' is not a valid metric name prefix",
                self.namespace
            ));
        }

        if self.refresh_interval_secs == 0 {
            return Err("Refresh interval must be greater than 0".to_string());
        }

        if self.org_concurrency == 0 || self.space_concurrency == 0 {
            return Err("Concurrency limits must be at least 1".to_string());
        }

        Ok(())
    }
}

impl Validate for CfConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating Cloud Foundry configuration");

        if self.api_url.is_empty() {
            return Err("API URL is required".to_string());
        }

        let url = Url::parse(&self.api_url).map_err(|e| format!("Invalid API URL: {}", e))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(format!(
                "API URL must use http:// or https:// scheme, got: {}",
                url.scheme()
            ));
        }

        if !self.has_client_credentials() && !self.has_user_credentials() {
            return Err(
                "Either client_id/client_secret or username/password must be set".to_string(),
            );
        }

        if self.timeout_secs == 0 {
            return Err("Request timeout must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        // Full filter directives are accepted; only bare levels are checked here.
        if !self.level.contains('=')
            && !self.level.contains(',')
            && !LOG_LEVELS.contains(&self.level.to_ascii_lowercase().as_str())
        {
            return Err(format!("Unknown log level: {}", self.level));
        }
        Ok(())
    }
}

fn is_valid_metric_prefix(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}
