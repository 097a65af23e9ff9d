use crate::domain::errors::PredictionError;
use crate::domain::pricing::row::FeatureRow;

/// Interface for trained price models.
///
/// Implementations are loaded once and shared read-only across requests, so
/// `predict` takes `&self` and must be deterministic for identical rows.
pub trait PricePredictor: Send + Sync {
    /// Predict a single row, in the model's log-price space.
    /// Errors are never retried or replaced by a fallback value.
    fn predict(&self, row: &FeatureRow) -> Result<f64, PredictionError>;

    /// Get model name/type
    fn name(&self) -> &str;

    /// Get model version/id
    fn version(&self) -> &str;
}
