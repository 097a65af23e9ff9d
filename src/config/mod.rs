//! Configuration module for homeprice.
//!
//! Structured configuration loading from environment variables, organized
//! by concern: Model artifacts, Serving, and Observability.

mod model_config;
mod observability_config;
mod serving_config;

pub use model_config::{ModelEnvConfig, default_features_path, default_model_path};
pub use observability_config::ObservabilityEnvConfig;
pub use serving_config::ServingEnvConfig;

use crate::domain::pricing::variant::PricingVariant;
use anyhow::Result;
use std::path::PathBuf;

/// Values supplied on the command line. Each one set here beats its
/// environment variable.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub variant: Option<PricingVariant>,
    pub model_path: Option<PathBuf>,
    pub features_path: Option<PathBuf>,
    pub port: Option<u16>,
}

/// Main application configuration.
///
/// Flattens the sub-configs so the rest of the crate reads plain fields.
#[derive(Debug, Clone)]
pub struct Config {
    // Model (from ModelEnvConfig)
    pub variant: PricingVariant,
    pub model_path: PathBuf,
    pub features_path: PathBuf,

    // Serving (from ServingEnvConfig)
    pub bind_address: String,
    pub port: u16,

    // Observability (from ObservabilityEnvConfig)
    pub observability_enabled: bool,
    pub observability_interval_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_env_with(ConfigOverrides::default())
    }

    /// Load configuration from environment variables, letting `overrides`
    /// take precedence field by field.
    pub fn from_env_with(overrides: ConfigOverrides) -> Result<Self> {
        let model = ModelEnvConfig::from_env(
            overrides.variant,
            overrides.model_path,
            overrides.features_path,
        )?;
        let serving = ServingEnvConfig::from_env();
        let observability = ObservabilityEnvConfig::from_env();

        Ok(Self {
            variant: model.variant,
            model_path: model.model_path,
            features_path: model.features_path,

            bind_address: serving.bind_address,
            port: overrides.port.unwrap_or(serving.port),

            observability_enabled: observability.enabled,
            observability_interval_secs: observability.interval_secs,
        })
    }

    /// `host:port` string for the HTTP listener.
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}
