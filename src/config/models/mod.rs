//! Configuration data models
//!
//! Every section deserializes with defaults so a minimal file only needs the
//! platform API URL and credentials.

pub mod cf;
pub mod exporter;
pub mod logging;
pub mod server;

pub use cf::*;
pub use exporter::*;
pub use logging::*;
pub use server::*;

/// Default listen host
pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

/// Default listen port
pub fn default_port() -> u16 {
    9193
}

/// Default path for the Prometheus scrape endpoint
pub fn default_metrics_path() -> String {
    "/metrics".to_string()
}

/// Default metric namespace
pub fn default_namespace() -> String {
    "cf".to_string()
}

/// Default refresh interval in seconds
pub fn default_refresh_interval_secs() -> u64 {
    300
}

/// Default fan-out width for both organization and space tasks
pub fn default_concurrency() -> usize {
    10
}

/// Default upstream request timeout in seconds
pub fn default_request_timeout_secs() -> u64 {
    30
}

/// Default log level
pub fn default_log_level() -> String {
    "info".to_string()
}
