//! Prometheus metrics definitions for homeprice
//!
//! All metrics use the `homeprice_` prefix and are read-only.

use prometheus::{
    CounterVec, Gauge, HistogramOpts, HistogramVec, Opts, Registry,
    core::{AtomicF64, GenericGauge},
};
use std::time::Duration;

/// Prometheus metrics for the inference service
#[derive(Clone)]
pub struct Metrics {
    /// Requests handled, by variant and outcome (ok, invalid, ...)
    pub predictions_total: CounterVec,
    /// End-to-end latency of successful predictions
    pub prediction_latency_seconds: HistogramVec,
    /// Most recent predicted price
    pub last_predicted_price: GenericGauge<AtomicF64>,
    /// Uptime in seconds
    pub uptime_seconds: GenericGauge<AtomicF64>,
}

impl Metrics {
    /// Create a new Metrics instance. Registration rejects malformed or
    /// duplicate metric names up front.
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let predictions_total = CounterVec::new(
            Opts::new(
                "homeprice_predictions_total",
                "Prediction requests by variant and outcome",
            ),
            &["variant", "outcome"],
        )?;
        registry.register(Box::new(predictions_total.clone()))?;

        let prediction_latency_seconds = HistogramVec::new(
            HistogramOpts::new(
                "homeprice_prediction_latency_seconds",
                "Prediction latency in seconds",
            )
            .buckets(vec![
                0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 1.0,
            ]),
            &["variant"],
        )?;
        registry.register(Box::new(prediction_latency_seconds.clone()))?;

        let last_predicted_price = Gauge::with_opts(Opts::new(
            "homeprice_last_predicted_price",
            "Most recent predicted price",
        ))?;
        registry.register(Box::new(last_predicted_price.clone()))?;

        let uptime_seconds = Gauge::with_opts(Opts::new(
            "homeprice_uptime_seconds",
            "Server uptime in seconds",
        ))?;
        registry.register(Box::new(uptime_seconds.clone()))?;

        Ok(Self {
            predictions_total,
            prediction_latency_seconds,
            last_predicted_price,
            uptime_seconds,
        })
    }

    pub fn record_prediction(&self, variant: &str, price: f64, latency: Duration) {
        self.predictions_total
            .with_label_values(&[variant, "ok"])
            .inc();
        self.prediction_latency_seconds
            .with_label_values(&[variant])
            .observe(latency.as_secs_f64());
        self.last_predicted_price.set(price);
    }

    pub fn record_failure(&self, variant: &str, outcome: &str) {
        self.predictions_total
            .with_label_values(&[variant, outcome])
            .inc();
    }

    /// Requests counted for a variant and outcome so far.
    pub fn count(&self, variant: &str, outcome: &str) -> u64 {
        self.predictions_total
            .with_label_values(&[variant, outcome])
            .get() as u64
    }
}
