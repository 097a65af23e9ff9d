//! Request to feature-row reconstruction.
//!
//! Reconstruction never reorders or drops columns to make a row fit: either
//! the schema is checked compatible at startup (`ensure_compatible`) or the
//! row builder fails on the first request.

use crate::domain::errors::{ReconstructionError, SchemaLoadError};
use crate::domain::ml::feature_registry::{POSTCODE_DISTRICT, postcode_schema};
use crate::domain::pricing::postcode::postcode_district;
use crate::domain::pricing::request::{
    BaselineRequest, FieldKind, PostcodeRequest, PredictRequest,
};
use crate::domain::pricing::row::{FeatureRow, FeatureValue};
use crate::domain::pricing::schema::{ColumnKind, FeatureSchema};
use crate::domain::pricing::variant::PricingVariant;

/// Build the feature row for a validated request.
pub fn reconstruct(
    schema: &FeatureSchema,
    request: &PredictRequest,
) -> Result<FeatureRow, ReconstructionError> {
    match request {
        PredictRequest::Baseline(req) => reconstruct_baseline(schema, req),
        PredictRequest::Postcode(req) => reconstruct_postcode(schema, req),
    }
}

fn reconstruct_baseline(
    schema: &FeatureSchema,
    request: &BaselineRequest,
) -> Result<FeatureRow, ReconstructionError> {
    let mut builder = FeatureRow::builder(schema);
    for column in schema.names() {
        let value = request
            .value_of(column)
            .ok_or_else(|| ReconstructionError::NoSourceField {
                column: column.to_string(),
            })?;
        builder.set(column, value)?;
    }
    builder.build()
}

fn reconstruct_postcode(
    schema: &FeatureSchema,
    request: &PostcodeRequest,
) -> Result<FeatureRow, ReconstructionError> {
    let district = postcode_district(&request.postcode);

    let mut builder = FeatureRow::builder(schema);
    builder
        .set(
            "CURRENT_ENERGY_EFFICIENCY",
            FeatureValue::Number(request.current_energy_efficiency),
        )?
        .set("TOTAL_FLOOR_AREA", FeatureValue::Number(request.total_floor_area))?
        .set(
            "NUMBER_HABITABLE_ROOMS",
            FeatureValue::Number(request.number_habitable_rooms),
        )?
        .set(
            "PROPERTYTYPE",
            FeatureValue::Category(request.property_type.clone()),
        )?
        .set("DURATION", FeatureValue::Category(request.duration.clone()))?
        .set(
            "CONSTRUCTION_AGE_BAND",
            FeatureValue::Category(request.construction_age_band.clone()),
        )?
        .set("BUILT_FORM", FeatureValue::Category(request.built_form.clone()))?
        .set(POSTCODE_DISTRICT, FeatureValue::Category(district))?;
    builder.build()
}

/// Reject at startup a schema the variant's requests cannot fill.
pub fn ensure_compatible(
    variant: PricingVariant,
    schema: &FeatureSchema,
) -> Result<(), SchemaLoadError> {
    let incompatible = |reason: String| SchemaLoadError::IncompatibleSchema {
        variant: variant.to_string(),
        reason,
    };

    match variant {
        PricingVariant::Baseline => {
            let fields = variant.request_fields();
            for column in schema.columns() {
                let field = fields
                    .iter()
                    .find(|f| f.name == column.name)
                    .ok_or_else(|| {
                        incompatible(format!("column {} has no request field", column.name))
                    })?;

                let kind_matches = match column.kind {
                    ColumnKind::Numeric => {
                        matches!(field.kind, FieldKind::Float | FieldKind::Integer)
                    }
                    ColumnKind::Categorical => field.kind == FieldKind::Text,
                };
                if !kind_matches {
                    return Err(incompatible(format!(
                        "column {} is {} but field {} is {:?}",
                        column.name, column.kind, field.name, field.kind
                    )));
                }
            }
            Ok(())
        }
        PricingVariant::Postcode => {
            let expected = postcode_schema()?;
            if *schema != expected {
                return Err(incompatible(format!(
                    "expected columns [{}], metadata lists [{}]",
                    expected.names().collect::<Vec<_>>().join(", "),
                    schema.names().collect::<Vec<_>>().join(", ")
                )));
            }
            Ok(())
        }
    }
}
