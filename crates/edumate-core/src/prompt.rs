//! Prompt construction for the upstream language model.
//!
//! The template is fixed; only the topic varies. Counts requested here are the
//! same constants the parser enforces, so the two cannot drift apart.

use crate::types::{OPTION_COUNT, Topic};

/// Number of note bullets requested.
pub const NOTE_COUNT: usize = 5;

/// Number of multiple-choice questions requested and returned.
pub const MCQ_COUNT: usize = 5;

/// Number of flashcards requested and returned.
pub const FLASHCARD_COUNT: usize = 3;

/// System message sent ahead of every generation request.
pub const SYSTEM_PROMPT: &str =
    "You are an expert educational content creator. Always respond with valid JSON only.";

const SCHEMA_EXAMPLE: &str = r#"{
  "notes": [
    "Clear, concise bullet point summarizing a key concept",
    "Another important point about the topic"
  ],
  "mcqs": [
    {
      "question": "What is the main concept of...?",
      "options": ["A) First option", "B) Second option", "C) Third option", "D) Fourth option"],
      "answer": "A"
    }
  ],
  "flashcards": [
    {
      "front": "Key term or question",
      "back": "Clear explanation or definition"
    }
  ]
}"#;

/// A two-part chat prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// Instructions for the model's role.
    pub system: String,
    /// The request itself, including the topic.
    pub user: String,
}

/// Builds generation prompts from validated topics.
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build the prompt for `topic`.
    #[must_use]
    pub fn build(topic: &Topic) -> Prompt {
        let user = format!(
            "You are EduMate AI, an expert educational content creator. \
Your task is to generate comprehensive study materials for the given topic.

TOPIC: {topic}

Generate study materials in the following STRICT JSON format:

{SCHEMA_EXAMPLE}

REQUIREMENTS:
1. NOTES: Generate EXACTLY {NOTE_COUNT} bullet points that clearly explain the topic. \
Use simple, student-friendly language.
2. MCQs: Generate EXACTLY {MCQ_COUNT} multiple-choice questions. Each must have \
{OPTION_COUNT} options labeled A), B), C), D) and an \"answer\" field holding the single \
letter of the one correct option.
3. FLASHCARDS: Generate EXACTLY {FLASHCARD_COUNT} flashcards with a question or term on \
the front and an explanation on the back.
4. All content must be accurate, educational, and appropriate for high school or early \
college level.
5. Return ONLY valid JSON. No markdown formatting, no code blocks, no additional text.

Ensure the JSON is properly formatted with double quotes and valid syntax."
        );

        Prompt {
            system: SYSTEM_PROMPT.to_string(),
            user,
        }
    }
}
