//! Read-only access to the model artifact and its feature metadata.

use crate::domain::errors::SchemaLoadError;
use crate::domain::pricing::schema::FeatureMetadata;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::info;

/// Read a whole artifact file. A missing file is reported separately from
/// other I/O failures so startup logs point at the misconfigured path.
pub fn read_artifact(path: &Path) -> Result<Vec<u8>, SchemaLoadError> {
    fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => SchemaLoadError::NotFound {
            path: path.to_path_buf(),
        },
        _ => SchemaLoadError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })
}

pub fn load_feature_metadata(path: &Path) -> Result<FeatureMetadata, SchemaLoadError> {
    let bytes = read_artifact(path)?;
    let metadata: FeatureMetadata =
        serde_json::from_slice(&bytes).map_err(|e| SchemaLoadError::Corrupt {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    info!(
        "Loaded feature metadata from {:?}: {} numeric, {} categorical",
        path,
        metadata.num_features.len(),
        metadata.cat_features.len()
    );
    Ok(metadata)
}
