use super::category_encoder::CategoryEncoder;
use super::predictor::PricePredictor;
use crate::domain::errors::{PredictionError, SchemaLoadError};
use crate::domain::pricing::row::FeatureRow;
use crate::infrastructure::persistence::artifact_store;
use smartcore::ensemble::random_forest_regressor::RandomForestRegressor;
use smartcore::linalg::basic::matrix::DenseMatrix;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

pub type Forest = RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// On-disk model file: the forest plus the number of features it was fit on.
///
/// The forest does not expose its input width, so training records it here.
#[derive(Serialize, Deserialize)]
pub struct ModelArtifact {
    pub n_features: usize,
    pub forest: Forest,
}

pub struct SmartCorePredictor {
    model: Forest,
    n_features: usize,
    encoder: CategoryEncoder,
    version: String,
}

impl SmartCorePredictor {
    pub fn new(artifact: ModelArtifact, encoder: CategoryEncoder, version: impl Into<String>) -> Self {
        Self {
            model: artifact.forest,
            n_features: artifact.n_features,
            encoder,
            version: version.into(),
        }
    }

    /// Load a `ModelArtifact` serialized with `serde_json`. Any failure is fatal to startup.
    pub fn load(
        model_path: &Path,
        encoder: CategoryEncoder,
        version: impl Into<String>,
    ) -> Result<Self, SchemaLoadError> {
        let buffer = artifact_store::read_artifact(model_path)?;

        let artifact: ModelArtifact =
            serde_json::from_slice(&buffer).map_err(|e| SchemaLoadError::Corrupt {
                path: model_path.to_path_buf(),
                reason: e.to_string(),
            })?;

        info!(
            "Successfully loaded ML model from {:?} ({} features)",
            model_path, artifact.n_features
        );
        Ok(Self::new(artifact, encoder, version))
    }

    /// Number of input features the forest was trained on.
    pub fn n_features(&self) -> usize {
        self.n_features
    }
}

impl PricePredictor for SmartCorePredictor {
    fn predict(&self, row: &FeatureRow) -> Result<f64, PredictionError> {
        let input_vec = self.encoder.encode(row)?;
        // Never hand smartcore a row narrower or wider than it was fit on
        if input_vec.len() != self.n_features {
            return Err(PredictionError::WidthMismatch {
                expected: self.n_features,
                actual: input_vec.len(),
            });
        }
        let input_matrix =
            DenseMatrix::from_2d_vec(&vec![input_vec]).map_err(|e| PredictionError::Inference {
                reason: format!("Matrix creation failed: {}", e),
            })?;

        let predictions = self
            .model
            .predict(&input_matrix)
            .map_err(|e| PredictionError::Inference {
                reason: format!("Prediction failed: {}", e),
            })?;

        let y_log = *predictions.first().ok_or(PredictionError::EmptyOutput)?;
        if !y_log.is_finite() {
            return Err(PredictionError::NonFinite { value: y_log });
        }
        Ok(y_log)
    }

    fn name(&self) -> &str {
        "SmartCore Random Forest"
    }

    fn version(&self) -> &str {
        &self.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pricing::row::FeatureValue;
    use crate::domain::pricing::schema::FeatureSchema;
    use smartcore::ensemble::random_forest_regressor::RandomForestRegressorParameters;
    use std::collections::BTreeMap;

    fn schema() -> FeatureSchema {
        FeatureSchema::from_groups(&["area"], &["form"]).unwrap()
    }

    fn encoder(schema: &FeatureSchema) -> CategoryEncoder {
        let categories = BTreeMap::from([(
            "form".to_string(),
            vec!["Detached".to_string(), "Terraced".to_string()],
        )]);
        CategoryEncoder::new(schema, &categories).unwrap()
    }

    /// Every target equal, so every tree is a single leaf holding that value.
    fn constant_forest(y: f64) -> ModelArtifact {
        let x = DenseMatrix::from_2d_vec(&vec![
            vec![50.0, 0.0],
            vec![70.0, 1.0],
            vec![90.0, 0.0],
            vec![110.0, 1.0],
            vec![130.0, 0.0],
            vec![150.0, 1.0],
        ])
        .unwrap();
        let targets = vec![y; 6];
        let params = RandomForestRegressorParameters::default()
            .with_n_trees(5)
            .with_max_depth(3);
        ModelArtifact {
            n_features: 2,
            forest: RandomForestRegressor::fit(&x, &targets, params).unwrap(),
        }
    }

    fn row(schema: &FeatureSchema, form: &str) -> FeatureRow {
        let mut builder = FeatureRow::builder(schema);
        builder
            .set("area", FeatureValue::Number(95.0))
            .unwrap()
            .set("form", FeatureValue::Category(form.to_string()))
            .unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn test_predicts_in_log_space() {
        let schema = schema();
        let y = 250_000_f64.ln();
        let predictor = SmartCorePredictor::new(constant_forest(y), encoder(&schema), "test");

        let prediction = predictor.predict(&row(&schema, "Detached")).unwrap();
        assert!((prediction - y).abs() < 1e-9);
        assert_eq!(predictor.version(), "test");
    }

    #[test]
    fn test_unseen_category_propagates() {
        let schema = schema();
        let predictor = SmartCorePredictor::new(constant_forest(12.0), encoder(&schema), "test");
        let err = predictor.predict(&row(&schema, "Castle")).unwrap_err();
        assert!(matches!(err, PredictionError::UnseenCategory { .. }));
    }

    #[test]
    fn test_missing_values_still_predict() {
        let schema = schema();
        let predictor = SmartCorePredictor::new(constant_forest(12.0), encoder(&schema), "test");
        let mut builder = FeatureRow::builder(&schema);
        builder
            .set("area", FeatureValue::Missing)
            .unwrap()
            .set("form", FeatureValue::Missing)
            .unwrap();
        let prediction = predictor.predict(&builder.build().unwrap()).unwrap();
        assert!((prediction - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_load_round_trips_serialized_model() {
        let schema = schema();
        let path = std::env::temp_dir().join(format!("homeprice-model-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, serde_json::to_vec(&constant_forest(11.5)).unwrap()).unwrap();

        let predictor = SmartCorePredictor::load(&path, encoder(&schema), "v-test").unwrap();
        let prediction = predictor.predict(&row(&schema, "Terraced")).unwrap();
        assert!((prediction - 11.5).abs() < 1e-9);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_declared_width_guards_inference() {
        let schema = schema();
        let mut artifact = constant_forest(12.0);
        artifact.n_features = 3;
        let predictor = SmartCorePredictor::new(artifact, encoder(&schema), "test");

        let err = predictor.predict(&row(&schema, "Detached")).unwrap_err();
        assert_eq!(
            err,
            PredictionError::WidthMismatch {
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn test_load_bare_forest_is_corrupt() {
        let schema = schema();
        let path = std::env::temp_dir().join(format!("homeprice-model-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, serde_json::to_vec(&constant_forest(11.5).forest).unwrap()).unwrap();

        let result = SmartCorePredictor::load(&path, encoder(&schema), "v-test");
        assert!(matches!(result, Err(SchemaLoadError::Corrupt { .. })));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_missing_model_fails() {
        let schema = schema();
        let result = SmartCorePredictor::load(
            Path::new("non_existent_model.json"),
            encoder(&schema),
            "v0",
        );
        assert!(matches!(result, Err(SchemaLoadError::NotFound { .. })));
    }
}
