//! Command line interface

use crate::config::Config;
use crate::utils::error::{ExporterError, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Parser)]
#[command(
    name = "cf-applications-exporter",
    version,
    about = "Prometheus exporter for Cloud Foundry applications"
)]
pub struct Cli {
    /// YAML configuration file
    #[arg(short, long, env = "CF_EXPORTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to listen on, as host:port
    #[arg(long, env = "CF_EXPORTER_LISTEN")]
    pub listen: Option<String>,

    /// Log level or tracing filter directive
    #[arg(long)]
    pub log_level: Option<String>,

    /// Print the effective configuration as YAML and exit
    #[arg(long)]
    pub dump_config: bool,
}

impl Cli {
    /// Build the effective configuration from the process environment
    pub async fn load_config(&self) -> Result<Config> {
        self.resolve_config(|key| std::env::var(key).ok()).await
    }

    /// File (or defaults), then `CF_EXPORTER_*` variables, then flags, then validation
    pub async fn resolve_config<F>(&self, lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path).await?,
            None => {
                info!("No configuration file given, starting from defaults");
                Config::default()
            }
        };

        config.apply_env_overrides(lookup)?;

        if let Some(listen) = &self.listen {
            let (host, port) = parse_listen(listen)?;
            config.server.host = host;
            config.server.port = port;
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }

        config.validate()?;
        Ok(config)
    }
}

/// Split `host:port`, accepting a bracketed IPv6 host
pub fn parse_listen(listen: &str) -> Result<(String, u16)> {
    let (host, port) = listen.rsplit_once(':').ok_or_else(|| {
        ExporterError::config(format!("Invalid listen address '{}': expected host:port", listen))
    })?;

    let port = port.parse().map_err(|e| {
        ExporterError::config(format!("Invalid port in listen address '{}': {}", listen, e))
    })?;
    let host = host.trim_start_matches('[').trim_end_matches(']');
    let host = if host.is_empty() { "0.0.0.0" } else { host };

    Ok((host.to_string(), port))
}
