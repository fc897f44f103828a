//! Server configuration from environment variables.

use std::env;
use std::fmt;
use std::time::Duration;

/// Default upstream API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
/// Default chat model.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo-1106";
/// Default bound on a single upstream call.
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);
/// Highest accepted value for `UPSTREAM_MAX_RETRIES`.
pub const MAX_UPSTREAM_RETRIES: u32 = 1;

/// Settings for the upstream language-model provider.
#[derive(Clone)]
pub struct UpstreamConfig {
    /// Provider API key.
    pub api_key: String,
    /// Provider base URL, without the `/v1` suffix.
    pub base_url: String,
    /// Chat model name.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Completion token limit.
    pub max_tokens: u32,
    /// Bound on one upstream call, retries included.
    pub timeout: Duration,
    /// Retries after a connection failure (0 or 1).
    pub max_retries: u32,
}

impl UpstreamConfig {
    /// Configuration with defaults for everything except the key.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: 2000,
            timeout: DEFAULT_UPSTREAM_TIMEOUT,
            max_retries: 1,
        }
    }
}

impl fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Upstream provider settings.
    pub upstream: UpstreamConfig,
    /// Server port to listen on.
    pub port: u16,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// CORS allowed origins (comma-separated or "*" for all).
    pub cors_allowed_origins: String,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `OPENAI_API_KEY`: Upstream provider credential
    ///
    /// Optional:
    /// - `OPENAI_BASE_URL`: Provider base URL (default: https://api.openai.com)
    /// - `OPENAI_MODEL`: Chat model (default: gpt-3.5-turbo-1106)
    /// - `OPENAI_TEMPERATURE`: Sampling temperature, 0.0 to 2.0 (default: 0.7)
    /// - `OPENAI_MAX_TOKENS`: Completion token limit (default: 2000)
    /// - `UPSTREAM_TIMEOUT_SECS`: Upstream call bound in seconds (default: 30)
    /// - `UPSTREAM_MAX_RETRIES`: Retries after a connection failure, 0 or 1 (default: 1)
    /// - `PORT`: Server port (default: 8000)
    /// - `LOG_LEVEL`: Logging level (default: "info")
    /// - `CORS_ALLOWED_ORIGINS`: Allowed CORS origins (default: "*")
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("OPENAI_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("OPENAI_API_KEY".to_string()))?;

        let mut upstream = UpstreamConfig::with_api_key(api_key.trim());

        if let Some(base_url) = lookup("OPENAI_BASE_URL") {
            let base_url = base_url.trim().trim_end_matches('/');
            if base_url.is_empty() {
                return Err(invalid("OPENAI_BASE_URL", "must not be empty"));
            }
            upstream.base_url = base_url.to_string();
        }

        if let Some(model) = lookup("OPENAI_MODEL") {
            let model = model.trim();
            if model.is_empty() {
                return Err(invalid("OPENAI_MODEL", "must not be empty"));
            }
            upstream.model = model.to_string();
        }

        if let Some(value) = lookup("OPENAI_TEMPERATURE") {
            let temperature: f32 = parse_number("OPENAI_TEMPERATURE", &value)?;
            if !(0.0..=2.0).contains(&temperature) {
                return Err(invalid("OPENAI_TEMPERATURE", "must be between 0.0 and 2.0"));
            }
            upstream.temperature = temperature;
        }

        if let Some(value) = lookup("OPENAI_MAX_TOKENS") {
            let max_tokens: u32 = parse_number("OPENAI_MAX_TOKENS", &value)?;
            if max_tokens == 0 {
                return Err(invalid("OPENAI_MAX_TOKENS", "must be greater than 0"));
            }
            upstream.max_tokens = max_tokens;
        }

        if let Some(value) = lookup("UPSTREAM_TIMEOUT_SECS") {
            let secs: u64 = parse_number("UPSTREAM_TIMEOUT_SECS", &value)?;
            if secs == 0 {
                return Err(invalid("UPSTREAM_TIMEOUT_SECS", "must be greater than 0 seconds"));
            }
            upstream.timeout = Duration::from_secs(secs);
        }

        if let Some(value) = lookup("UPSTREAM_MAX_RETRIES") {
            let retries: u32 = parse_number("UPSTREAM_MAX_RETRIES", &value)?;
            if retries > MAX_UPSTREAM_RETRIES {
                return Err(invalid(
                    "UPSTREAM_MAX_RETRIES",
                    &format!("must be at most {MAX_UPSTREAM_RETRIES}"),
                ));
            }
            upstream.max_retries = retries;
        }

        let port = match lookup("PORT") {
            Some(value) => parse_number("PORT", &value)?,
            None => 8000,
        };

        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        let cors_allowed_origins =
            lookup("CORS_ALLOWED_ORIGINS").unwrap_or_else(|| "*".to_string());

        Ok(Self {
            upstream,
            port,
            log_level,
            cors_allowed_origins,
        })
    }

    /// Get the socket address for the server.
    pub fn socket_addr(&self) -> std::net::SocketAddr {
        std::net::SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(name, &format!("'{value}' is not a valid number")))
}

fn invalid(name: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Required environment variable is missing.
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// Invalid environment variable value.
    #[error("invalid value for environment variable {name}: {reason}")]
    InvalidValue { name: String, reason: String },
}
