use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading the model artifact or its feature metadata.
/// All of them are fatal: the server refuses to start.
#[derive(Debug, Error)]
pub enum SchemaLoadError {
    #[error("Artifact not found: {path:?}")]
    NotFound { path: PathBuf },

    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt artifact {path:?}: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    #[error("Feature schema is empty")]
    EmptySchema,

    #[error("Duplicate feature column: {column}")]
    DuplicateColumn { column: String },

    #[error("No category vocabulary for categorical column {column}")]
    MissingVocabulary { column: String },

    #[error("Feature schema incompatible with the {variant} request: {reason}")]
    IncompatibleSchema { variant: String, reason: String },

    #[error("Metadata declares target transform {declared}, {variant} expects {expected}")]
    TransformMismatch {
        variant: String,
        declared: String,
        expected: String,
    },
}

/// The constraint a request field violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    Missing,
    FloatType,
    IntType,
    StringType,
    JsonInvalid,
    NotAnObject,
}

impl ViolationKind {
    /// Machine-readable tag used in the HTTP error body.
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationKind::Missing => "missing",
            ViolationKind::FloatType => "float_type",
            ViolationKind::IntType => "int_type",
            ViolationKind::StringType => "string_type",
            ViolationKind::JsonInvalid => "json_invalid",
            ViolationKind::NotAnObject => "model_attributes_type",
        }
    }
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldViolation {
    /// Offending field, `None` when the body as a whole is rejected.
    pub field: Option<String>,
    pub kind: ViolationKind,
    pub message: String,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "{}: {}", field, self.message),
            None => write!(f, "body: {}", self.message),
        }
    }
}

/// Request rejected before feature reconstruction.
#[derive(Debug, Clone, Error)]
#[error("Request validation failed: {}", summarize(.violations))]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn body(kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            violations: vec![FieldViolation {
                field: None,
                kind,
                message: message.into(),
            }],
        }
    }

    /// Names of the offending fields, in report order.
    pub fn fields(&self) -> Vec<&str> {
        self.violations
            .iter()
            .filter_map(|v| v.field.as_deref())
            .collect()
    }
}

fn summarize(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// A feature row could not be assembled against the schema.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReconstructionError {
    #[error("Column {column} is not part of the feature schema")]
    UnknownColumn { column: String },

    #[error("Column {column} set twice")]
    DuplicateValue { column: String },

    #[error("Column {column} expects a {expected} value")]
    KindMismatch {
        column: String,
        expected: &'static str,
    },

    #[error("Columns left unfilled: {}", .columns.join(", "))]
    Unfilled { columns: Vec<String> },

    #[error("Request has no field for schema column {column}")]
    NoSourceField { column: String },
}

/// The model rejected a row or produced an unusable value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictionError {
    #[error("Unseen category {value:?} for column {column}")]
    UnseenCategory { column: String, value: String },

    #[error("Feature row has {actual} columns, model expects {expected}")]
    WidthMismatch { expected: usize, actual: usize },

    #[error("Feature row column {position} is {actual}, model expects {expected}")]
    ColumnMismatch {
        position: usize,
        expected: String,
        actual: String,
    },

    #[error("Model returned no prediction")]
    EmptyOutput,

    #[error("Prediction is not a finite number: {value}")]
    NonFinite { value: f64 },

    #[error("Model inference failed: {reason}")]
    Inference { reason: String },
}

/// Per-request failure surfaced at the HTTP boundary.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Reconstruction(#[from] ReconstructionError),

    #[error(transparent)]
    Prediction(#[from] PredictionError),

    #[error("Inference task aborted: {reason}")]
    TaskAborted { reason: String },
}

impl ServiceError {
    /// Label used for the `outcome` metric dimension.
    pub fn outcome(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => "invalid",
            ServiceError::Reconstruction(_) => "reconstruction_failed",
            ServiceError::Prediction(_) | ServiceError::TaskAborted { .. } => "prediction_failed",
        }
    }
}
