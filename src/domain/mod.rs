// Feature ordering shared with the training pipeline
pub mod ml;

// Request validation, feature reconstruction and target transforms
pub mod pricing;

// Domain-specific error types
pub mod errors;
