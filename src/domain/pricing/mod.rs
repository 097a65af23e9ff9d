//! Request → feature row → price contract shared by both deployments.

pub mod postcode;
pub mod reconstruct;
pub mod request;
pub mod row;
pub mod schema;
pub mod transform;
pub mod variant;

pub use postcode::postcode_district;
pub use reconstruct::{ensure_compatible, reconstruct};
pub use request::{BaselineRequest, PostcodeRequest, PredictRequest};
pub use row::{FeatureRow, FeatureValue};
pub use schema::{ColumnKind, FeatureColumn, FeatureMetadata, FeatureSchema};
pub use transform::TargetTransform;
pub use variant::PricingVariant;
