//! Validate → Reconstruct → Predict → Detransform, for one configured variant.

use crate::application::ml::predictor::PricePredictor;
use crate::domain::errors::{ReconstructionError, SchemaLoadError, ServiceError, ValidationError};
use crate::domain::pricing::reconstruct::{ensure_compatible, reconstruct};
use crate::domain::pricing::request::PredictRequest;
use crate::domain::pricing::row::FeatureRow;
use crate::domain::pricing::schema::{FeatureMetadata, FeatureSchema};
use crate::domain::pricing::variant::PricingVariant;
use crate::infrastructure::observability::Metrics;
use std::sync::Arc;
use std::time::Instant;
use tracing::{Instrument, Span, debug, info_span, warn};
use uuid::Uuid;

/// Outcome of one inference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePrediction {
    /// Raw model output, in log-price space.
    pub log_price: f64,
    /// Detransformed and rounded price.
    pub price: f64,
}

/// Check feature metadata against a variant and derive its schema.
///
/// Runs before the model is loaded so a mismatched metadata file fails fast.
pub fn verify_metadata(
    variant: PricingVariant,
    metadata: &FeatureMetadata,
) -> Result<FeatureSchema, SchemaLoadError> {
    let schema = metadata.schema()?;
    ensure_compatible(variant, &schema)?;

    let expected = variant.target_transform();
    if let Some(declared) = metadata.target_transform.filter(|d| *d != expected) {
        return Err(SchemaLoadError::TransformMismatch {
            variant: variant.to_string(),
            declared: declared.to_string(),
            expected: expected.to_string(),
        });
    }

    Ok(schema)
}

/// Process-wide inference state. Built once at startup, never mutated.
pub struct PricingService {
    variant: PricingVariant,
    schema: FeatureSchema,
    predictor: Arc<dyn PricePredictor>,
    metrics: Metrics,
}

impl PricingService {
    pub fn new(
        variant: PricingVariant,
        schema: FeatureSchema,
        predictor: Arc<dyn PricePredictor>,
        metrics: Metrics,
    ) -> Result<Self, SchemaLoadError> {
        ensure_compatible(variant, &schema)?;
        Ok(Self {
            variant,
            schema,
            predictor,
            metrics,
        })
    }

    pub fn variant(&self) -> PricingVariant {
        self.variant
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn parse(&self, body: &[u8]) -> Result<PredictRequest, ValidationError> {
        PredictRequest::parse(self.variant, body)
    }

    pub fn build_row(&self, request: &PredictRequest) -> Result<FeatureRow, ReconstructionError> {
        reconstruct(&self.schema, request)
    }

    /// Reconstruct, predict and detransform a validated request. CPU-bound.
    pub fn price(&self, request: &PredictRequest) -> Result<PricePrediction, ServiceError> {
        let row = self.build_row(request)?;
        debug!("Feature row: {:?}", row);

        let log_price = self.predictor.predict(&row)?;
        let price = self.variant.target_transform().detransform(log_price)?;
        Ok(PricePrediction { log_price, price })
    }

    /// Full request path for a raw body. Inference runs on the blocking pool
    /// so a slow model never stalls other requests.
    pub async fn predict(self: Arc<Self>, body: &[u8]) -> Result<PricePrediction, ServiceError> {
        let span = info_span!("predict", request_id = %Uuid::new_v4(), variant = %self.variant);
        let started = Instant::now();

        let result = self.run(body).instrument(span.clone()).await;

        span.in_scope(|| match &result {
            Ok(prediction) => {
                self.metrics.record_prediction(
                    self.variant.as_str(),
                    prediction.price,
                    started.elapsed(),
                );
                debug!(
                    "Predicted {} (log {:.6}) in {:?}",
                    prediction.price,
                    prediction.log_price,
                    started.elapsed()
                );
            }
            Err(e) => {
                self.metrics.record_failure(self.variant.as_str(), e.outcome());
                match e {
                    ServiceError::Validation(_) => debug!("Rejected request: {}", e),
                    _ => warn!("Prediction failed: {}", e),
                }
            }
        });
        result
    }

    async fn run(self: &Arc<Self>, body: &[u8]) -> Result<PricePrediction, ServiceError> {
        let request = self.parse(body)?;
        let service = Arc::clone(self);
        let span = Span::current();

        tokio::task::spawn_blocking(move || span.in_scope(|| service.price(&request)))
            .await
            .map_err(|e| ServiceError::TaskAborted {
                reason: e.to_string(),
            })?
    }
}
