//! Model artifact configuration parsing from environment variables.
//!
//! Selects the deployed variant and where its two artifacts live.

use crate::domain::pricing::variant::PricingVariant;
use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Model environment configuration
#[derive(Debug, Clone)]
pub struct ModelEnvConfig {
    pub variant: PricingVariant,
    pub model_path: PathBuf,
    pub features_path: PathBuf,
}

impl ModelEnvConfig {
    /// Read `PRICING_VARIANT`, `MODEL_PATH` and `FEATURES_PATH`.
    ///
    /// Values passed in take precedence over the environment. Paths left
    /// unset default to the variant's files under `models/`.
    pub fn from_env(
        variant: Option<PricingVariant>,
        model_path: Option<PathBuf>,
        features_path: Option<PathBuf>,
    ) -> Result<Self> {
        let variant = match variant {
            Some(variant) => variant,
            None => {
                let raw = env::var("PRICING_VARIANT").unwrap_or_else(|_| "baseline".to_string());
                PricingVariant::from_str(&raw).context("Failed to parse PRICING_VARIANT")?
            }
        };

        let model_path = model_path
            .or_else(|| env::var_os("MODEL_PATH").map(PathBuf::from))
            .unwrap_or_else(|| default_model_path(variant));
        let features_path = features_path
            .or_else(|| env::var_os("FEATURES_PATH").map(PathBuf::from))
            .unwrap_or_else(|| default_features_path(variant));

        Ok(Self {
            variant,
            model_path,
            features_path,
        })
    }
}

pub fn default_model_path(variant: PricingVariant) -> PathBuf {
    PathBuf::from(format!("models/{}_rf_model.json", variant))
}

pub fn default_features_path(variant: PricingVariant) -> PathBuf {
    PathBuf::from(format!("models/{}_features.json", variant))
}
