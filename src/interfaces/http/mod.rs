//! HTTP surface: `GET /health` and `POST /predict`.

pub mod error;
pub mod handlers;

use crate::application::pricing_service::PricingService;
use axum::{
    Router,
    routing::{get, post},
};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

pub fn router(service: Arc<PricingService>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/predict", post(handlers::predict))
        .with_state(service)
}

/// Serve until `shutdown` resolves. In-flight requests are allowed to finish.
pub async fn serve<F>(
    listener: TcpListener,
    service: Arc<PricingService>,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let variant = service.variant();
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, %variant, "Inference server listening");
    }

    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown)
        .await
}
