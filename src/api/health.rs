//! Health check endpoints

use axum::{http::StatusCode, routing::get, Router};
use serde::{Deserialize, Serialize};

use crate::api::types::Json;

/// Health response shared by both services
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub service: String,
}

/// `/health` and `/live` for the named service
pub fn health_routes<S>(service: &'static str) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(move || health_check(service)))
        .route("/live", get(live_check))
}

/// Returns 200 while the process is serving
pub async fn health_check(service: &'static str) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        service: service.to_string(),
    })
}

pub async fn live_check() -> StatusCode {
    StatusCode::OK
}
