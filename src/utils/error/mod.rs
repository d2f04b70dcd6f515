//! Error handling for the exporter
//!
//! A single error type is shared by the API client, the refresh pipeline,
//! configuration loading and the HTTP server.

mod helpers;
mod types;

pub use types::{ExporterError, Result};
