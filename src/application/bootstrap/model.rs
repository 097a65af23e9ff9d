use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use crate::application::ml::category_encoder::CategoryEncoder;
use crate::application::ml::predictor::PricePredictor;
use crate::application::ml::smartcore_predictor::SmartCorePredictor;
use crate::application::pricing_service::{PricingService, verify_metadata};
use crate::config::Config;
use crate::domain::errors::SchemaLoadError;
use crate::infrastructure::observability::Metrics;
use crate::infrastructure::persistence::artifact_store;

pub struct ModelBootstrap;

impl ModelBootstrap {
    /// Load metadata and model once, check them against the configured
    /// variant and assemble the shared pricing service.
    ///
    /// Any failure here aborts startup; the server never runs half-loaded.
    pub fn init(config: &Config, metrics: Metrics) -> Result<Arc<PricingService>> {
        let variant = config.variant;

        // 1. Feature metadata, checked before the (larger) model is read
        let metadata = artifact_store::load_feature_metadata(&config.features_path)
            .context("Failed to load feature metadata")?;
        let schema = verify_metadata(variant, &metadata)
            .with_context(|| format!("Feature metadata unusable for {} variant", variant))?;
        info!(
            "Feature schema ({} columns): {}",
            schema.len(),
            schema.names().collect::<Vec<_>>().join(", ")
        );

        // 2. Model artifact
        let encoder = CategoryEncoder::new(&schema, &metadata.categories)
            .context("Failed to build category encoder")?;
        let schema_width = encoder.width();
        let version = metadata
            .model_version
            .clone()
            .unwrap_or_else(|| artifact_version(&config.model_path));
        let predictor = SmartCorePredictor::load(&config.model_path, encoder, version)
            .context("Failed to load model artifact")?;
        if predictor.n_features() != schema_width {
            return Err(SchemaLoadError::IncompatibleSchema {
                variant: variant.to_string(),
                reason: format!(
                    "model was trained on {} features, feature metadata lists {} columns",
                    predictor.n_features(),
                    schema_width
                ),
            })
            .context("Model artifact does not match feature metadata");
        }
        info!(
            "Model ready: {} {} (target transform: {})",
            predictor.name(),
            predictor.version(),
            variant.target_transform()
        );

        // 3. Shared service
        let service = PricingService::new(variant, schema, Arc::new(predictor), metrics)?;
        Ok(Arc::new(service))
    }
}

/// Falls back to the artifact file stem, e.g. `postcode_rf_model_v2`.
fn artifact_version(path: &std::path::Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unversioned".to_string())
}
