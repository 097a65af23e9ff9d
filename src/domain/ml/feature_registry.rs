use crate::domain::errors::SchemaLoadError;
use crate::domain::pricing::schema::FeatureSchema;

/// Derived column holding the outward code of `POSTCODE`.
pub const POSTCODE_DISTRICT: &str = "POSTCODE_DISTRICT";

/// Numeric inputs of the postcode model, in training order.
pub const POSTCODE_NUMERIC_FEATURES: &[&str] = &[
    "CURRENT_ENERGY_EFFICIENCY",
    "TOTAL_FLOOR_AREA",
    "NUMBER_HABITABLE_ROOMS",
];

/// Categorical inputs of the postcode model, in training order.
/// This order MUST match exactly with the order used by the training pipeline.
/// Any change here is a breaking change for deployed models.
pub const POSTCODE_CATEGORICAL_FEATURES: &[&str] = &[
    "PROPERTYTYPE",
    "DURATION",
    "CONSTRUCTION_AGE_BAND",
    "BUILT_FORM",
    POSTCODE_DISTRICT,
];

/// The fixed feature schema of the postcode model.
pub fn postcode_schema() -> Result<FeatureSchema, SchemaLoadError> {
    FeatureSchema::from_groups(POSTCODE_NUMERIC_FEATURES, POSTCODE_CATEGORICAL_FEATURES)
}
