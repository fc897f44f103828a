//! API error types with JSON envelope responses.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use edumate_core::{MalformedResponse, ValidationError};
use serde::Serialize;

use crate::generator::UpstreamError;

/// API error that can be returned from handlers.
///
/// The `Display` text is for logs. Clients only ever see
/// [`ApiError::client_message`], which never includes provider internals.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Invalid caller input (400).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Upstream provider unreachable, failing, or too slow (503).
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Upstream provider rejected our credentials (502).
    #[error("upstream rejected credentials")]
    UpstreamAuthError,

    /// Upstream provider is throttling us (429).
    #[error("upstream rate limited")]
    UpstreamRateLimited,

    /// Upstream reply did not match the study material schema (502).
    #[error("malformed upstream response: {0}")]
    MalformedUpstreamResponse(String),

    /// No route matched (404).
    #[error("not found: {0}")]
    NotFound(String),
}

impl ApiError {
    /// Get the error code string for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::UpstreamUnavailable(_) => "UPSTREAM_UNAVAILABLE",
            Self::UpstreamAuthError => "UPSTREAM_AUTH_ERROR",
            Self::UpstreamRateLimited => "UPSTREAM_RATE_LIMITED",
            Self::MalformedUpstreamResponse(_) => "MALFORMED_UPSTREAM_RESPONSE",
            Self::NotFound(_) => "NOT_FOUND",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::UpstreamUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::UpstreamAuthError => StatusCode::BAD_GATEWAY,
            Self::UpstreamRateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::MalformedUpstreamResponse(_) => StatusCode::BAD_GATEWAY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    /// Message safe to show to API clients.
    pub fn client_message(&self) -> String {
        match self {
            Self::InvalidInput(message) => message.clone(),
            Self::UpstreamUnavailable(_) => {
                "The study material service is temporarily unavailable. Please try again."
                    .to_string()
            }
            Self::UpstreamAuthError => {
                "API configuration error. Please contact support.".to_string()
            }
            Self::UpstreamRateLimited => {
                "Too many requests. Please try again in a moment.".to_string()
            }
            Self::MalformedUpstreamResponse(_) => {
                "The AI returned study material in an unexpected format. Please try again."
                    .to_string()
            }
            Self::NotFound(path) => format!("not found: {path}"),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

impl From<MalformedResponse> for ApiError {
    fn from(err: MalformedResponse) -> Self {
        Self::MalformedUpstreamResponse(err.to_string())
    }
}

impl From<UpstreamError> for ApiError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Auth => Self::UpstreamAuthError,
            UpstreamError::RateLimited => Self::UpstreamRateLimited,
            UpstreamError::InvalidResponse(message) => Self::MalformedUpstreamResponse(message),
            err @ (UpstreamError::Timeout | UpstreamError::Unavailable(_)) => {
                Self::UpstreamUnavailable(err.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidInput(format!("Invalid request body: {}", rejection.body_text()))
    }
}

/// Error envelope: `{"success": false, "error": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Always `false`.
    pub success: bool,
    /// Human-readable error message.
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.code(), error = %self, "Request failed");
        } else {
            tracing::warn!(code = self.code(), error = %self, "Request rejected");
        }

        let body = ErrorResponse {
            success: false,
            error: self.client_message(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;
