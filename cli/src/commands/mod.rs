//! Command implementations for the edumate CLI.
//!
//! Each command module provides:
//! - Args struct for clap argument parsing
//! - execute() function that performs the command
//! - Human-readable and JSON output formatting

pub mod generate;
pub mod health;

use anyhow::Result;
use reqwest::StatusCode;
use serde::Serialize;

/// Common error type for HTTP requests.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },
}

/// Print output in JSON or human-readable format.
pub fn output<T: Serialize + HumanReadable>(value: &T, human: bool) -> Result<()> {
    if human {
        value.print_human();
    } else {
        println!("{}", serde_json::to_string_pretty(value)?);
    }
    Ok(())
}

/// Trait for types that can be printed in human-readable format.
pub trait HumanReadable {
    fn print_human(&self);
}

/// Send a request and decode a successful JSON body.
pub async fn make_request<T: serde::de::DeserializeOwned>(
    request: reqwest::RequestBuilder,
) -> Result<T, CliError> {
    let response = request.send().await?;
    let status = response.status();

    if status.is_success() {
        Ok(response.json::<T>().await?)
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(server_error(status, &body))
    }
}

/// Build a server error, preferring the `error` field of the JSON envelope.
fn server_error(status: StatusCode, body: &str) -> CliError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| json.get("error").and_then(|v| v.as_str()).map(String::from))
        .unwrap_or_else(|| body.to_string());

    CliError::Server {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_reads_envelope() {
        let err = server_error(
            StatusCode::BAD_REQUEST,
            r#"{"success":false,"error":"Topic cannot be empty"}"#,
        );
        assert_eq!(err.to_string(), "Server error (400): Topic cannot be empty");
    }

    #[test]
    fn test_server_error_falls_back_to_raw_body() {
        let err = server_error(StatusCode::BAD_GATEWAY, "upstream connect error");
        assert_eq!(err.to_string(), "Server error (502): upstream connect error");
    }
}
