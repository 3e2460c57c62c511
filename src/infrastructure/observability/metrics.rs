//! Prometheus metrics definitions
//!
//! All metrics use the `insurance_` prefix.

use prometheus::{CounterVec, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder};
use std::sync::Arc;

/// Prometheus metrics for the prediction pipeline
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,
    /// Successful predictions by model
    pub predictions_total: CounterVec,
    /// Rejected or failed requests by error kind
    pub prediction_errors_total: CounterVec,
    /// Negative model outputs clamped to zero, by model
    pub clamped_outputs_total: CounterVec,
    /// Encode + inference latency in seconds, by model
    pub inference_latency_seconds: HistogramVec,
}

impl Metrics {
    /// Create a new Metrics instance with all counters registered
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let predictions_total = CounterVec::new(
            Opts::new("insurance_predictions_total", "Total successful predictions by model"),
            &["model"],
        )?;
        registry.register(Box::new(predictions_total.clone()))?;

        let prediction_errors_total = CounterVec::new(
            Opts::new(
                "insurance_prediction_errors_total",
                "Total rejected or failed predictions by error kind",
            ),
            &["kind"],
        )?;
        registry.register(Box::new(prediction_errors_total.clone()))?;

        let clamped_outputs_total = CounterVec::new(
            Opts::new(
                "insurance_clamped_outputs_total",
                "Negative model outputs clamped to zero",
            ),
            &["model"],
        )?;
        registry.register(Box::new(clamped_outputs_total.clone()))?;

        let inference_latency_seconds = HistogramVec::new(
            HistogramOpts::new(
                "insurance_inference_latency_seconds",
                "Model inference latency in seconds",
            )
            .buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5]),
            &["model"],
        )?;
        registry.register(Box::new(inference_latency_seconds.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            predictions_total,
            prediction_errors_total,
            clamped_outputs_total,
            inference_latency_seconds,
        })
    }

    /// Render all metrics in Prometheus text format
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder
            .encode_to_string(&metric_families)
            .unwrap_or_default()
    }

    pub fn inc_predictions(&self, model: &str) {
        self.predictions_total.with_label_values(&[model]).inc();
    }

    pub fn inc_errors(&self, kind: &str) {
        self.prediction_errors_total.with_label_values(&[kind]).inc();
    }

    pub fn inc_clamped(&self, model: &str) {
        self.clamped_outputs_total.with_label_values(&[model]).inc();
    }

    pub fn observe_inference_latency(&self, model: &str, latency: f64) {
        self.inference_latency_seconds
            .with_label_values(&[model])
            .observe(latency);
    }
}
