//! Startup wiring: turns configuration into ready-to-serve components.

pub mod model;

pub use model::ModelBootstrap;
