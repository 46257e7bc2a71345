//! Router construction and serving.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::{handlers, state::AppState};

/// Builds the service router with CORS and request tracing applied.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/predict_1day", post(handlers::predict_1day))
        .route("/predict_7day", post(handlers::predict_7day))
        .route("/forecast_1day", post(handlers::forecast_1day))
        .route("/forecast_7day", post(handlers::forecast_7day))
        .route("/historical", get(handlers::historical))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds `addr` and serves until the task is cancelled.
pub async fn serve(addr: &str, state: Arc<AppState>) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "forecast service listening");
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}
