//! Observability for the prediction pipeline
//!
//! Metrics are collected in-process and rendered in Prometheus text format;
//! serving them is left to the enclosing service.

pub mod metrics;

pub use metrics::Metrics;
