//! Push-based observability for homeprice
//!
//! Metrics are pushed as periodic structured JSON logs to stdout (for Loki,
//! Fluentd, CloudWatch). The service exposes no metrics endpoint.

pub mod metrics;
pub mod reporter;

pub use metrics::Metrics;
pub use reporter::MetricsReporter;
