//! Integration tests for cf-applications-exporter
//!
//! These tests verify the interaction between the refresh pipeline, the
//! collector, the HTTP routes and the Cloud Foundry client.

pub mod config_tests;
pub mod exporter_tests;
