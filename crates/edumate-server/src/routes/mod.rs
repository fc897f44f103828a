//! Route definitions for the HTTP API.

pub mod generate;
pub mod health;

use axum::{Router, http::Uri};

use crate::error::ApiError;
use crate::state::AppState;

/// Build the complete router with all routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(generate::routes())
        .fallback(not_found)
        .with_state(state)
}

/// Unknown paths get the same error envelope as every other failure.
async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(uri.path().to_string())
}
