//! homeprice server - house price inference over HTTP
//!
//! Loads one model variant at startup and serves `/health` and `/predict`.
//! Metrics are pushed via structured JSON logs to stdout.
//!
//! # Usage
//! ```sh
//! PRICING_VARIANT=postcode cargo run --bin server
//! cargo run --bin server -- --variant baseline --port 8080
//! ```
//!
//! # Environment Variables
//! - `PRICING_VARIANT` - `baseline` or `postcode` (default: baseline)
//! - `MODEL_PATH` / `FEATURES_PATH` - Artifact locations (default: under `models/`)
//! - `BIND_ADDRESS` / `PORT` - Listener (default: 127.0.0.1:8000)
//! - `OBSERVABILITY_ENABLED` - Enable metrics reporting (default: true)
//! - `OBSERVABILITY_INTERVAL` - Interval in seconds between metric outputs (default: 60)

use anyhow::{Context, Result};
use clap::Parser;
use homeprice::application::bootstrap::ModelBootstrap;
use homeprice::config::{Config, ConfigOverrides};
use homeprice::domain::pricing::variant::PricingVariant;
use homeprice::infrastructure::observability::{Metrics, MetricsReporter};
use homeprice::interfaces::http;
use std::path::PathBuf;
use std::str::FromStr;
use tokio::net::TcpListener;
use tracing::{Level, info, warn};
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Model variant to serve (baseline | postcode)
    #[arg(long)]
    variant: Option<String>,

    /// Path to the serialized model artifact
    #[arg(long)]
    model: Option<PathBuf>,

    /// Path to the feature metadata JSON
    #[arg(long)]
    features: Option<PathBuf>,

    /// Port to listen on
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    info!("homeprice server {} starting...", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let variant = args
        .variant
        .as_deref()
        .map(PricingVariant::from_str)
        .transpose()
        .context("Invalid --variant")?;
    let config = Config::from_env_with(ConfigOverrides {
        variant,
        model_path: args.model,
        features_path: args.features,
        port: args.port,
    })?;
    info!(
        "Configuration loaded: Variant={}, Model={:?}, Features={:?}",
        config.variant, config.model_path, config.features_path
    );

    // Load artifacts; any failure here is fatal
    let metrics = Metrics::new().context("Failed to create metrics registry")?;
    let service = ModelBootstrap::init(&config, metrics.clone())?;

    if config.observability_enabled {
        let reporter = MetricsReporter::new(
            metrics,
            config.variant.as_str(),
            config.observability_interval_secs,
        );
        tokio::spawn(async move {
            reporter.run().await;
        });
        info!(
            "Metrics reporter started (interval: {}s)",
            config.observability_interval_secs
        );
    } else {
        info!("Metrics reporting disabled.");
    }

    let listener = TcpListener::bind(config.listen_address())
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_address()))?;

    info!("Server running. Press Ctrl+C to shutdown.");
    http::serve(listener, service, shutdown_signal()).await?;
    info!("Shutdown complete.");

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received. Draining requests..."),
        Err(e) => {
            warn!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
