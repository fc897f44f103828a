//! The upstream generation provider and its error taxonomy.
//!
//! Everything outside this module talks to the provider through
//! [`Generator`], so tests can swap in a deterministic stub.

pub mod openai;

use async_trait::async_trait;
use edumate_core::Prompt;

pub use openai::OpenAiGenerator;

/// Errors from the upstream provider.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UpstreamError {
    /// The call exceeded its time bound.
    #[error("provider request timed out")]
    Timeout,

    /// The provider could not be reached or failed on its side.
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    /// The provider rejected our credentials.
    #[error("provider authentication failed")]
    Auth,

    /// The provider is throttling us.
    #[error("provider rate limit reached")]
    RateLimited,

    /// The provider answered, but not in a shape we can read.
    #[error("provider returned an invalid response: {0}")]
    InvalidResponse(String),
}

/// Produces raw model text for a prompt.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Send `prompt` upstream and return the model's text reply.
    async fn generate(&self, prompt: &Prompt) -> Result<String, UpstreamError>;
}
