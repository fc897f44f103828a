//! OpenAI Chat Completions client.
//!
//! Works against any server that speaks the `/v1/chat/completions` wire
//! format; point `OPENAI_BASE_URL` elsewhere to use one.

use async_trait::async_trait;
use edumate_core::Prompt;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use super::{Generator, UpstreamError};
use crate::config::UpstreamConfig;

const MAX_ERROR_MESSAGE_LEN: usize = 256;

/// Generator backed by an OpenAI-compatible HTTP API.
pub struct OpenAiGenerator {
    client: Client,
    config: UpstreamConfig,
}

impl OpenAiGenerator {
    /// Build a client from upstream settings.
    pub fn new(config: UpstreamConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    fn endpoint_url(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn build_payload<'a>(&'a self, prompt: &'a Prompt) -> ChatCompletionsRequest<'a> {
        ChatCompletionsRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        }
    }

    async fn read_response(response: reqwest::Response) -> Result<String, UpstreamError> {
        let status = response.status();
        let body = response.text().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_http_error(status, &body));
        }

        let decoded: ChatCompletionsResponse = serde_json::from_str(&body).map_err(|e| {
            UpstreamError::InvalidResponse(format!("chat completion decode failed: {e}"))
        })?;

        decoded
            .choices
            .into_iter()
            .find_map(|choice| choice.message.and_then(|m| m.content))
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| {
                UpstreamError::InvalidResponse("chat completion contained no text".to_string())
            })
    }
}

#[async_trait]
impl Generator for OpenAiGenerator {
    async fn generate(&self, prompt: &Prompt) -> Result<String, UpstreamError> {
        let payload = self.build_payload(prompt);
        let url = self.endpoint_url();
        let mut attempt = 0;

        loop {
            let result = self
                .client
                .post(&url)
                .bearer_auth(&self.config.api_key)
                .json(&payload)
                .send()
                .await;

            match result {
                Ok(response) => return Self::read_response(response).await,
                Err(e) if e.is_connect() && attempt < self.config.max_retries => {
                    attempt += 1;
                    tracing::warn!(attempt, error = %e, "Upstream connection failed, retrying");
                }
                Err(e) => return Err(map_transport_error(e)),
            }
        }
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatCompletionsRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionsResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: String,
    #[serde(rename = "type", default)]
    error_type: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

// ============================================================================
// Error mapping
// ============================================================================

fn map_http_error(status: StatusCode, body: &str) -> UpstreamError {
    let detail = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error);
    let error_type = detail.as_ref().and_then(|d| d.error_type.as_deref());
    let error_code = detail.as_ref().and_then(|d| d.code.as_deref());

    if status == StatusCode::UNAUTHORIZED
        || status == StatusCode::FORBIDDEN
        || matches!(error_type, Some("authentication_error"))
        || matches!(error_code, Some("invalid_api_key" | "invalid_authentication"))
    {
        return UpstreamError::Auth;
    }

    if status == StatusCode::TOO_MANY_REQUESTS
        || matches!(error_type, Some("rate_limit_error" | "insufficient_quota"))
        || matches!(error_code, Some("rate_limit_exceeded" | "insufficient_quota"))
    {
        return UpstreamError::RateLimited;
    }

    if status == StatusCode::REQUEST_TIMEOUT || status == StatusCode::GATEWAY_TIMEOUT {
        return UpstreamError::Timeout;
    }

    let message = detail
        .map(|d| d.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| truncate_message(body));

    UpstreamError::Unavailable(format!("HTTP {status}: {message}"))
}

fn map_transport_error(error: reqwest::Error) -> UpstreamError {
    if error.is_timeout() {
        return UpstreamError::Timeout;
    }
    UpstreamError::Unavailable(format!("transport error: {error}"))
}

fn truncate_message(body: &str) -> String {
    let compact = body.trim().replace('\n', " ");
    compact.chars().take(MAX_ERROR_MESSAGE_LEN).collect()
}
