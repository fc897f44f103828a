//! Service info and health check endpoints.
//!
//! Neither touches the upstream provider, so both answer 200 even when it is
//! down.

use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::state::AppState;

/// Response for GET /.
#[derive(Debug, Serialize)]
pub struct InfoResponse {
    /// Greeting.
    pub message: String,
    /// Server crate version.
    pub version: String,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service name.
    pub service: String,
}

/// GET / - Service info.
async fn info() -> Json<InfoResponse> {
    Json(InfoResponse {
        message: "EduMate AI API is running!".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /health - Health check endpoint.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "edumate-ai".to_string(),
    })
}

/// Build info and health check routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(info))
        .route("/health", get(health_check))
}
