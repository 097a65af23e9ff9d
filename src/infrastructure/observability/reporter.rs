//! Push-based metrics reporter for homeprice
//!
//! Periodically outputs metrics as structured JSON to stdout.
//!
//! **Security**: This reporter only SENDS data, it never accepts requests.

use crate::infrastructure::observability::metrics::Metrics;
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{info, warn};

const OUTCOMES: [&str; 4] = ["ok", "invalid", "reconstruction_failed", "prediction_failed"];

/// Metrics snapshot for JSON output
#[derive(Serialize)]
pub struct MetricsSnapshot {
    pub timestamp: String,
    pub uptime_seconds: u64,
    pub version: String,
    pub variant: String,
    pub predictions: PredictionSnapshot,
}

#[derive(Serialize)]
pub struct PredictionSnapshot {
    pub ok: u64,
    pub invalid: u64,
    pub reconstruction_failed: u64,
    pub prediction_failed: u64,
    pub last_predicted_price: Option<f64>,
}

impl PredictionSnapshot {
    pub fn total(&self) -> u64 {
        self.ok + self.invalid + self.reconstruction_failed + self.prediction_failed
    }
}

/// Push-based metrics reporter
///
/// Outputs metrics as structured JSON logs on a configurable interval.
pub struct MetricsReporter {
    metrics: Metrics,
    variant: String,
    start_time: Instant,
    interval: Duration,
}

impl MetricsReporter {
    /// Create a new metrics reporter
    ///
    /// # Arguments
    /// * `metrics` - Prometheus metrics shared with the pricing service
    /// * `variant` - Deployed variant, used as the counter label
    /// * `interval_seconds` - How often to output metrics (default: 60)
    pub fn new(metrics: Metrics, variant: impl Into<String>, interval_seconds: u64) -> Self {
        Self {
            metrics,
            variant: variant.into(),
            start_time: Instant::now(),
            interval: Duration::from_secs(interval_seconds.max(1)),
        }
    }

    /// Run the reporter in a loop, outputting metrics periodically
    pub async fn run(self) {
        info!(
            "MetricsReporter: Starting push-based metrics (interval: {:?})",
            self.interval
        );

        loop {
            tokio::time::sleep(self.interval).await;

            let snapshot = self.collect_snapshot();
            match serde_json::to_string(&snapshot) {
                Ok(json) => {
                    // Use a special prefix so logs can be easily filtered
                    println!("METRICS_JSON:{}", json);
                    info!(
                        "Predictions: {} ok / {} total | Uptime: {}s",
                        snapshot.predictions.ok,
                        snapshot.predictions.total(),
                        snapshot.uptime_seconds
                    );
                }
                Err(e) => warn!("Failed to serialize metrics: {}", e),
            }
        }
    }

    /// Collect current metrics snapshot
    fn collect_snapshot(&self) -> MetricsSnapshot {
        let uptime = self.start_time.elapsed().as_secs();
        self.metrics.uptime_seconds.set(uptime as f64);

        let [ok, invalid, reconstruction_failed, prediction_failed] =
            OUTCOMES.map(|outcome| self.metrics.count(&self.variant, outcome));

        let last_predicted_price =
            (ok > 0).then(|| self.metrics.last_predicted_price.get());

        MetricsSnapshot {
            timestamp: chrono::Utc::now().to_rfc3339(),
            uptime_seconds: uptime,
            version: env!("CARGO_PKG_VERSION").to_string(),
            variant: self.variant.clone(),
            predictions: PredictionSnapshot {
                ok,
                invalid,
                reconstruction_failed,
                prediction_failed,
                last_predicted_price,
            },
        }
    }
}
