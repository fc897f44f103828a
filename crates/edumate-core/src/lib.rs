//! edumate-core: study material types and the contract logic around them.
//!
//! This crate provides:
//! - Validated request types (`Topic`)
//! - The study material schema (notes, MCQs, flashcards)
//! - Prompt construction for the upstream language model
//! - Parsing and validation of the model's raw reply
//!
//! Nothing here performs I/O; the server crate owns the network edges.

pub mod error;
pub mod parse;
pub mod prompt;
pub mod types;

pub use error::{MalformedResponse, ValidationError};
pub use parse::{extract_json_payload, parse_study_material};
pub use prompt::{FLASHCARD_COUNT, MCQ_COUNT, NOTE_COUNT, Prompt, PromptBuilder};
pub use types::{AnswerLetter, Flashcard, Mcq, OPTION_COUNT, StudyMaterial, Topic};
