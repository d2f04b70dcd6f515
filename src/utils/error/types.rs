//! Error types for the exporter

use thiserror::Error;

/// Result type alias for the exporter
pub type Result<T> = std::result::Result<T, ExporterError>;

/// Main error type for the exporter
#[derive(Error, Debug)]
pub enum ExporterError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Undecodable JSON from the platform API or UAA
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration file parsing and dumping
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Configuration file reads
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed URLs, either configured or returned by the platform
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Token acquisition failures
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Non-success responses from the platform API
    #[error("API error: {url} returned {status}: {message}")]
    Api {
        status: u16,
        url: String,
        message: String,
    },

    /// Metric registration and encoding errors
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}
