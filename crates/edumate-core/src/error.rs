//! Error types for topic validation and response parsing.

/// A caller-supplied value failed validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The topic was empty or contained only whitespace.
    #[error("Topic cannot be empty")]
    EmptyTopic,

    /// The topic is shorter than the minimum length.
    #[error("Topic must be at least {min} characters long")]
    TopicTooShort { min: usize },

    /// The topic is longer than the maximum length.
    #[error("Topic must be at most {max} characters long")]
    TopicTooLong { max: usize },
}

/// The model's reply did not match the study material schema.
///
/// `path` locates the offending field (e.g. `mcqs[2].answer`). The message is
/// meant for logs; callers should not forward it to end users.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed study material at {path}: {reason}")]
pub struct MalformedResponse {
    pub path: String,
    pub reason: String,
}

impl MalformedResponse {
    pub fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
