// Startup wiring
pub mod bootstrap;

// Model adapters and the predictor seam
pub mod ml;

// Request pipeline
pub mod pricing_service;
