//! Core data types for generated study material.
//!
//! Every value here is transient: built for one request, serialized into the
//! response, then dropped. Invariants that the wire format cannot express
//! (option count, answer letters, topic length) are enforced by construction.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

// ============================================================================
// Topic
// ============================================================================

/// Minimum topic length in characters, after trimming.
pub const TOPIC_MIN_CHARS: usize = 2;

/// Maximum topic length in characters, after trimming.
pub const TOPIC_MAX_CHARS: usize = 200;

/// A validated study topic.
///
/// Stored trimmed. Length is measured in Unicode scalar values so that
/// non-Latin topics get the same budget as ASCII ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Topic(String);

impl Topic {
    /// Validate a raw topic string.
    ///
    /// Fails when the topic is empty, whitespace-only, shorter than
    /// [`TOPIC_MIN_CHARS`], or longer than [`TOPIC_MAX_CHARS`].
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyTopic);
        }

        let len = trimmed.chars().count();
        if len < TOPIC_MIN_CHARS {
            return Err(ValidationError::TopicTooShort {
                min: TOPIC_MIN_CHARS,
            });
        }
        if len > TOPIC_MAX_CHARS {
            return Err(ValidationError::TopicTooLong {
                max: TOPIC_MAX_CHARS,
            });
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Returns the topic text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Topic {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Topic {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ============================================================================
// Multiple-choice questions
// ============================================================================

/// Number of options every MCQ carries.
pub const OPTION_COUNT: usize = 4;

/// The letter label of an MCQ option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnswerLetter {
    A,
    B,
    C,
    D,
}

impl AnswerLetter {
    /// All letters in option order.
    pub const ALL: [AnswerLetter; OPTION_COUNT] = [Self::A, Self::B, Self::C, Self::D];

    /// Zero-based position of the option this letter labels.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
            Self::C => 2,
            Self::D => 3,
        }
    }

    /// The uppercase label character.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
            Self::D => 'D',
        }
    }

    /// Case-insensitive conversion from a single character.
    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(Self::A),
            'B' => Some(Self::B),
            'C' => Some(Self::C),
            'D' => Some(Self::D),
            _ => None,
        }
    }
}

impl fmt::Display for AnswerLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for AnswerLetter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c)
                .ok_or_else(|| format!("answer must be one of A, B, C, D, got '{s}'")),
            _ => Err(format!("answer must be a single letter, got '{s}'")),
        }
    }
}

/// A multiple-choice question with four labeled options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mcq {
    /// Question text.
    pub question: String,
    /// Options in A-D order, each prefixed with its label (e.g. `"A) ..."`).
    pub options: [String; OPTION_COUNT],
    /// Letter of the correct option.
    pub answer: AnswerLetter,
}

impl Mcq {
    /// Text of the option the answer points at.
    #[must_use]
    pub fn correct_option(&self) -> &str {
        &self.options[self.answer.index()]
    }
}

// ============================================================================
// Flashcards and the full payload
// ============================================================================

/// A front/back pair for spaced-repetition review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    /// Term or prompt.
    pub front: String,
    /// Definition or explanation.
    pub back: String,
}

/// Study material generated for one topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyMaterial {
    /// Bullet-style notes, in the order produced.
    pub notes: Vec<String>,
    /// Multiple-choice questions.
    pub mcqs: Vec<Mcq>,
    /// Flashcards.
    pub flashcards: Vec<Flashcard>,
}
