use super::error::ApiError;
use crate::application::pricing_service::PricingService;
use axum::{Json, body::Bytes, extract::State};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub predicted_price: f64,
}

/// Liveness only. Never touches the model.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Raw bytes in, so malformed JSON surfaces as a 422 with our own body
/// rather than the extractor's plain-text rejection.
pub async fn predict(
    State(service): State<Arc<PricingService>>,
    body: Bytes,
) -> Result<Json<PredictResponse>, ApiError> {
    let prediction = service.predict(&body).await?;
    Ok(Json(PredictResponse {
        predicted_price: prediction.price,
    }))
}
