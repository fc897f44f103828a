//! Study material generation endpoint.
//!
//! - POST /api/generate - Generate notes, MCQs, and flashcards for a topic

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::post,
};
use edumate_core::StudyMaterial;
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::state::AppState;

/// Request body for POST /api/generate.
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    /// Topic to generate study material for.
    pub topic: String,
}

/// Success envelope for POST /api/generate.
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    /// Always `true`; failures use the error envelope.
    pub success: bool,
    /// The generated material.
    pub data: StudyMaterial,
}

/// POST /api/generate - Generate study material.
///
/// # Response
///
/// - 200 OK: `{ "success": true, "data": { "notes", "mcqs", "flashcards" } }`
/// - 400 Bad Request: invalid topic or body
/// - 429 / 502 / 503: upstream provider failure
async fn generate_study_material(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> ApiResult<Json<GenerateResponse>> {
    let Json(request) = payload?;
    let data = state.service().generate(&request.topic).await?;

    Ok(Json(GenerateResponse {
        success: true,
        data,
    }))
}

/// Build generation routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/api/generate", post(generate_study_material))
}
