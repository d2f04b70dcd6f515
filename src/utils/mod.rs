//! Utility modules for the exporter
//!
//! - **error**: the crate-wide error type and `Result` alias
//! - **logging**: `tracing` subscriber setup

pub mod error;
pub mod logging;
