//! edumate-server: HTTP API that turns a study topic into study material.
//!
//! This crate provides:
//! - `GET /` and `GET /health` info endpoints
//! - `POST /api/generate`, which prompts an upstream language model and
//!   returns validated notes, MCQs, and flashcards
//! - A uniform `{"success": false, "error": "..."}` envelope for failures
//!
//! # Architecture
//!
//! The server is built on Axum with a middleware stack for:
//! - Request ID generation and propagation
//! - Request tracing and logging
//! - CORS handling
//! - JSON error responses
//!
//! The upstream provider sits behind the [`generator::Generator`] trait.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use edumate_server::{build_app, config::ServerConfig, generator::OpenAiGenerator};
//! use edumate_server::{service::StudyService, state::AppState};
//!
//! let config = ServerConfig::from_env()?;
//! let generator = OpenAiGenerator::new(config.upstream.clone())?;
//! let service = StudyService::new(Arc::new(generator), config.upstream.timeout);
//! let app = build_app(AppState::new(service), &config.cors_allowed_origins)?;
//! ```

pub mod config;
pub mod error;
pub mod generator;
pub mod middleware;
pub mod routes;
pub mod service;
pub mod state;

use axum::{Router, body::Body};
use http::{HeaderValue, Request};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::middleware::request_id::{assign_request_id, echo_request_id, span_request_id};

// Re-exports for convenience
pub use config::{ConfigError, ServerConfig, UpstreamConfig};
pub use error::{ApiError, ApiResult};
pub use generator::{Generator, OpenAiGenerator, UpstreamError};
pub use service::StudyService;
pub use state::AppState;

// Re-export dependent crates
pub use edumate_core;

/// Build the router with the full middleware stack.
///
/// Fails when `cors_allowed_origins` lists an origin that is not a valid
/// header value.
pub fn build_app(state: AppState, cors_allowed_origins: &str) -> Result<Router, ConfigError> {
    let cors = build_cors_layer(cors_allowed_origins)?;

    let trace = TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
        tracing::info_span!(
            "http_request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = span_request_id(request),
        )
    });

    Ok(routes::build_router(state)
        .layer(echo_request_id())
        .layer(trace)
        .layer(cors)
        .layer(assign_request_id()))
}

/// Build CORS layer from configuration.
fn build_cors_layer(allowed_origins: &str) -> Result<CorsLayer, ConfigError> {
    let allow_origin = if allowed_origins.trim() == "*" {
        AllowOrigin::from(Any)
    } else {
        let origins = allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(|origin| {
                origin.parse::<HeaderValue>().map_err(|_| ConfigError::InvalidValue {
                    name: "CORS_ALLOWED_ORIGINS".to_string(),
                    reason: format!("'{origin}' is not a valid origin"),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any))
}
