//! Shared fixtures: artifacts written to a scratch directory and a server
//! bound to an ephemeral port.

#![allow(dead_code)]

use homeprice::application::bootstrap::ModelBootstrap;
use homeprice::application::ml::smartcore_predictor::ModelArtifact;
use homeprice::application::pricing_service::PricingService;
use homeprice::config::Config;
use homeprice::domain::pricing::schema::FeatureMetadata;
use homeprice::domain::pricing::transform::TargetTransform;
use homeprice::domain::pricing::variant::PricingVariant;
use homeprice::infrastructure::observability::Metrics;
use homeprice::interfaces::http;
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

pub fn postcode_metadata() -> FeatureMetadata {
    FeatureMetadata {
        num_features: strings(&[
            "CURRENT_ENERGY_EFFICIENCY",
            "TOTAL_FLOOR_AREA",
            "NUMBER_HABITABLE_ROOMS",
        ]),
        cat_features: strings(&[
            "PROPERTYTYPE",
            "DURATION",
            "CONSTRUCTION_AGE_BAND",
            "BUILT_FORM",
            "POSTCODE_DISTRICT",
        ]),
        categories: BTreeMap::from([
            ("PROPERTYTYPE".to_string(), strings(&["Detached", "Flat", "Terraced"])),
            ("DURATION".to_string(), strings(&["Freehold", "Leasehold"])),
            (
                "CONSTRUCTION_AGE_BAND".to_string(),
                strings(&["1950-1966", "1967-1975", "2012 onwards"]),
            ),
            ("BUILT_FORM".to_string(), strings(&["Detached", "Flat", "Mid-Terrace"])),
            ("POSTCODE_DISTRICT".to_string(), strings(&["", "B15", "M1", "SW1A"])),
        ]),
        target_transform: Some(TargetTransform::Log),
        model_version: Some("postcode-test".to_string()),
    }
}

pub fn baseline_metadata() -> FeatureMetadata {
    FeatureMetadata {
        num_features: strings(&["TOTAL_FLOOR_AREA", "CURRENT_ENERGY_EFFICIENCY", "year"]),
        cat_features: strings(&["PROPERTY_TYPE", "BUILT_FORM"]),
        categories: BTreeMap::from([
            ("PROPERTY_TYPE".to_string(), strings(&["Flat", "House"])),
            ("BUILT_FORM".to_string(), strings(&["Detached", "Semi-Detached"])),
        ]),
        target_transform: Some(TargetTransform::Log1p),
        model_version: None,
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// A model artifact whose every leaf holds `y`, `width` features wide.
pub fn constant_forest(width: usize, y: f64) -> ModelArtifact {
    let rows: Vec<Vec<f64>> = (0..8)
        .map(|i| (0..width).map(|j| ((i + j) % 3) as f64).collect())
        .collect();
    let x = DenseMatrix::from_2d_vec(&rows).expect("training matrix");
    let targets = vec![y; rows.len()];
    let params = RandomForestRegressorParameters::default()
        .with_n_trees(4)
        .with_max_depth(3);
    ModelArtifact {
        n_features: width,
        forest: RandomForestRegressor::fit(&x, &targets, params).expect("training"),
    }
}

/// Scratch directory holding one model and one metadata file.
pub struct Artifacts {
    pub dir: PathBuf,
    pub model_path: PathBuf,
    pub features_path: PathBuf,
}

impl Artifacts {
    pub fn write(metadata: &FeatureMetadata, model: &ModelArtifact) -> Self {
        let dir = std::env::temp_dir().join(format!("homeprice-it-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).expect("scratch dir");
        let model_path = dir.join("model.json");
        let features_path = dir.join("features.json");
        std::fs::write(&model_path, serde_json::to_vec(model).expect("model json"))
            .expect("write model");
        std::fs::write(
            &features_path,
            serde_json::to_vec_pretty(metadata).expect("metadata json"),
        )
        .expect("write metadata");
        Self {
            dir,
            model_path,
            features_path,
        }
    }

    pub fn config(&self, variant: PricingVariant) -> Config {
        Config {
            variant,
            model_path: self.model_path.clone(),
            features_path: self.features_path.clone(),
            bind_address: "127.0.0.1".to_string(),
            port: 0,
            observability_enabled: false,
            observability_interval_secs: 60,
        }
    }
}

impl Drop for Artifacts {
    fn drop(&mut self) {
        std::fs::remove_dir_all(&self.dir).ok();
    }
}

pub fn bootstrap(artifacts: &Artifacts, variant: PricingVariant) -> Arc<PricingService> {
    let metrics = Metrics::new().expect("metrics");
    ModelBootstrap::init(&artifacts.config(variant), metrics).expect("bootstrap")
}

/// Running server; dropping it triggers graceful shutdown.
pub struct TestServer {
    pub addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub async fn start(service: Arc<PricingService>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let (tx, rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            http::serve(listener, service, async {
                rx.await.ok();
            })
            .await
            .expect("serve");
        });
        Self {
            addr,
            shutdown: Some(tx),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            tx.send(()).ok();
        }
    }
}
