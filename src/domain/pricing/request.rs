//! Declared request schemas and their validation.
//!
//! Each variant declares its fields as a static table. Validation walks the
//! whole table and reports every offending field at once, then the typed
//! request is read out of the already-checked JSON object.

use crate::domain::errors::{FieldViolation, ValidationError, ViolationKind};
use crate::domain::pricing::row::FeatureValue;
use crate::domain::pricing::variant::PricingVariant;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Float,
    Integer,
    Text,
}

impl FieldKind {
    fn accepts(&self, value: &Value) -> bool {
        match self {
            FieldKind::Float => value.is_number(),
            FieldKind::Integer => as_integer(value).is_some(),
            FieldKind::Text => value.is_string(),
        }
    }

    fn violation(&self) -> (ViolationKind, &'static str) {
        match self {
            FieldKind::Float => (ViolationKind::FloatType, "Input should be a valid number"),
            FieldKind::Integer => (ViolationKind::IntType, "Input should be a valid integer"),
            FieldKind::Text => (ViolationKind::StringType, "Input should be a valid string"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

const fn optional(name: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec {
        name,
        kind,
        required: false,
    }
}

const fn required(name: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec {
        name,
        kind,
        required: true,
    }
}

pub const BASELINE_FIELDS: &[FieldSpec] = &[
    optional("TOTAL_FLOOR_AREA", FieldKind::Float),
    optional("CURRENT_ENERGY_EFFICIENCY", FieldKind::Float),
    optional("NUMBER_HABITABLE_ROOMS", FieldKind::Float),
    required("year", FieldKind::Integer),
    optional("property_type", FieldKind::Text),
    optional("duration", FieldKind::Text),
    optional("old_new", FieldKind::Text),
    optional("PROPERTY_TYPE", FieldKind::Text),
    optional("CURRENT_ENERGY_RATING", FieldKind::Text),
    optional("BUILT_FORM", FieldKind::Text),
];

pub const POSTCODE_FIELDS: &[FieldSpec] = &[
    required("POSTCODE", FieldKind::Text),
    required("PROPERTYTYPE", FieldKind::Text),
    required("DURATION", FieldKind::Text),
    required("CURRENT_ENERGY_EFFICIENCY", FieldKind::Float),
    required("TOTAL_FLOOR_AREA", FieldKind::Float),
    required("NUMBER_HABITABLE_ROOMS", FieldKind::Float),
    required("CONSTRUCTION_AGE_BAND", FieldKind::Text),
    required("BUILT_FORM", FieldKind::Text),
];

/// Integers may arrive as `2020` or `2020.0`.
fn as_integer(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
            .map(|f| f as i64)
    })
}

/// Check a parsed body against a field table, collecting every violation.
pub fn validate_fields<'a>(
    body: &'a Value,
    fields: &[FieldSpec],
) -> Result<&'a Map<String, Value>, ValidationError> {
    let object = body.as_object().ok_or_else(|| {
        ValidationError::body(
            ViolationKind::NotAnObject,
            "Input should be a valid dictionary or object",
        )
    })?;

    let mut violations = Vec::new();
    for spec in fields {
        match object.get(spec.name) {
            None if spec.required => violations.push(FieldViolation {
                field: Some(spec.name.to_string()),
                kind: ViolationKind::Missing,
                message: "Field required".to_string(),
            }),
            None | Some(Value::Null) if !spec.required => {}
            Some(value) if spec.kind.accepts(value) => {}
            Some(_) | None => {
                let (kind, message) = spec.kind.violation();
                violations.push(FieldViolation {
                    field: Some(spec.name.to_string()),
                    kind,
                    message: message.to_string(),
                });
            }
        }
    }

    if violations.is_empty() {
        Ok(object)
    } else {
        Err(ValidationError { violations })
    }
}

/// Typed accessors over an object that already passed `validate_fields`.
struct Fields<'a>(&'a Map<String, Value>);

impl Fields<'_> {
    fn float(&self, name: &str) -> Option<f64> {
        self.0.get(name).and_then(Value::as_f64)
    }

    fn integer(&self, name: &str) -> Option<i64> {
        self.0.get(name).and_then(as_integer)
    }

    fn text(&self, name: &str) -> Option<String> {
        self.0.get(name).and_then(Value::as_str).map(str::to_string)
    }
}

/// Variant A request: mostly optional EPC and price-paid attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct BaselineRequest {
    pub total_floor_area: Option<f64>,
    pub current_energy_efficiency: Option<f64>,
    pub number_habitable_rooms: Option<f64>,
    pub year: i64,
    pub property_type: Option<String>,
    pub duration: Option<String>,
    pub old_new: Option<String>,
    /// EPC property type (`PROPERTY_TYPE`), distinct from the price-paid
    /// `property_type` code.
    pub epc_property_type: Option<String>,
    pub current_energy_rating: Option<String>,
    pub built_form: Option<String>,
}

impl BaselineRequest {
    pub fn from_json(body: &Value) -> Result<Self, ValidationError> {
        let fields = Fields(validate_fields(body, BASELINE_FIELDS)?);
        Ok(Self {
            total_floor_area: fields.float("TOTAL_FLOOR_AREA"),
            current_energy_efficiency: fields.float("CURRENT_ENERGY_EFFICIENCY"),
            number_habitable_rooms: fields.float("NUMBER_HABITABLE_ROOMS"),
            year: fields
                .integer("year")
                .ok_or_else(|| missing_after_validation("year"))?,
            property_type: fields.text("property_type"),
            duration: fields.text("duration"),
            old_new: fields.text("old_new"),
            epc_property_type: fields.text("PROPERTY_TYPE"),
            current_energy_rating: fields.text("CURRENT_ENERGY_RATING"),
            built_form: fields.text("BUILT_FORM"),
        })
    }

    /// Value of a declared field by its wire name; `None` if no such field exists.
    pub fn value_of(&self, field: &str) -> Option<FeatureValue> {
        let value = match field {
            "TOTAL_FLOOR_AREA" => FeatureValue::from_float(self.total_floor_area),
            "CURRENT_ENERGY_EFFICIENCY" => FeatureValue::from_float(self.current_energy_efficiency),
            "NUMBER_HABITABLE_ROOMS" => FeatureValue::from_float(self.number_habitable_rooms),
            "year" => FeatureValue::Number(self.year as f64),
            "property_type" => FeatureValue::from_text(self.property_type.as_deref()),
            "duration" => FeatureValue::from_text(self.duration.as_deref()),
            "old_new" => FeatureValue::from_text(self.old_new.as_deref()),
            "PROPERTY_TYPE" => FeatureValue::from_text(self.epc_property_type.as_deref()),
            "CURRENT_ENERGY_RATING" => FeatureValue::from_text(self.current_energy_rating.as_deref()),
            "BUILT_FORM" => FeatureValue::from_text(self.built_form.as_deref()),
            _ => return None,
        };
        Some(value)
    }
}

/// Variant B request: every field required, postcode still raw.
#[derive(Debug, Clone, PartialEq)]
pub struct PostcodeRequest {
    pub postcode: String,
    pub property_type: String,
    pub duration: String,
    pub current_energy_efficiency: f64,
    pub total_floor_area: f64,
    pub number_habitable_rooms: f64,
    pub construction_age_band: String,
    pub built_form: String,
}

impl PostcodeRequest {
    pub fn from_json(body: &Value) -> Result<Self, ValidationError> {
        let fields = Fields(validate_fields(body, POSTCODE_FIELDS)?);
        let text = |name: &'static str| fields.text(name).ok_or_else(|| missing_after_validation(name));
        let float =
            |name: &'static str| fields.float(name).ok_or_else(|| missing_after_validation(name));

        Ok(Self {
            postcode: text("POSTCODE")?,
            property_type: text("PROPERTYTYPE")?,
            duration: text("DURATION")?,
            current_energy_efficiency: float("CURRENT_ENERGY_EFFICIENCY")?,
            total_floor_area: float("TOTAL_FLOOR_AREA")?,
            number_habitable_rooms: float("NUMBER_HABITABLE_ROOMS")?,
            construction_age_band: text("CONSTRUCTION_AGE_BAND")?,
            built_form: text("BUILT_FORM")?,
        })
    }
}

// Unreachable once validate_fields passed; kept as an error rather than a panic.
fn missing_after_validation(field: &str) -> ValidationError {
    ValidationError {
        violations: vec![FieldViolation {
            field: Some(field.to_string()),
            kind: ViolationKind::Missing,
            message: "Field required".to_string(),
        }],
    }
}

/// A validated request for either variant.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictRequest {
    Baseline(BaselineRequest),
    Postcode(PostcodeRequest),
}

impl PredictRequest {
    /// Parse and validate a raw request body for the given variant.
    pub fn parse(variant: PricingVariant, body: &[u8]) -> Result<Self, ValidationError> {
        let value: Value = serde_json::from_slice(body).map_err(|e| {
            ValidationError::body(ViolationKind::JsonInvalid, format!("JSON decode error: {}", e))
        })?;
        Self::from_value(variant, &value)
    }

    pub fn from_value(variant: PricingVariant, value: &Value) -> Result<Self, ValidationError> {
        match variant {
            PricingVariant::Baseline => BaselineRequest::from_json(value).map(Self::Baseline),
            PricingVariant::Postcode => PostcodeRequest::from_json(value).map(Self::Postcode),
        }
    }

    pub fn variant(&self) -> PricingVariant {
        match self {
            PredictRequest::Baseline(_) => PricingVariant::Baseline,
            PredictRequest::Postcode(_) => PricingVariant::Postcode,
        }
    }
}
