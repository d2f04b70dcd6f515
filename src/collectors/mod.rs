//! Metric collectors
//!
//! Each collector pairs a background refresher with a Prometheus
//! [`Collector`](prometheus::core::Collector) that serves its latest snapshot.

pub mod applications;
