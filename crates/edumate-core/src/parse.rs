//! Parsing and validation of the model's raw reply.
//!
//! The upstream model is asked for JSON but nothing guarantees it complies, so
//! this is the one place that treats input as hostile. The reply is walked as
//! a `serde_json::Value` rather than deserialized directly so that failures
//! can name the exact field that was wrong.

use serde_json::{Map, Value};

use crate::error::MalformedResponse;
use crate::prompt::{FLASHCARD_COUNT, MCQ_COUNT};
use crate::types::{AnswerLetter, Flashcard, Mcq, OPTION_COUNT, StudyMaterial};

type ParseResult<T> = Result<T, MalformedResponse>;

/// Locate the JSON object inside a model reply.
///
/// Handles a reply wrapped in a Markdown code fence and a reply with prose
/// around the object. Returns `None` when no candidate object exists.
pub fn extract_json_payload(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(fenced) = extract_fenced_block(trimmed) {
        let fenced = fenced.trim();
        if !fenced.is_empty() {
            return Some(fenced);
        }
    }

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    (start <= end).then_some(&trimmed[start..=end])
}

fn extract_fenced_block(text: &str) -> Option<&str> {
    let stripped = text.strip_prefix("```")?;
    let first_newline = stripped.find('\n')?;
    let (_, rest) = stripped.split_at(first_newline + 1);
    let end = rest.rfind("```")?;
    Some(&rest[..end])
}

/// Parse and validate a raw model reply into [`StudyMaterial`].
///
/// Surplus MCQs and flashcards are dropped; too few of either is an error.
/// Options are ordered by their letter labels and relabelled as `X) text`.
pub fn parse_study_material(raw: &str) -> ParseResult<StudyMaterial> {
    let payload = extract_json_payload(raw)
        .ok_or_else(|| MalformedResponse::new("$", "reply did not contain a JSON object"))?;

    let value: Value = serde_json::from_str(payload)
        .map_err(|e| MalformedResponse::new("$", format!("invalid JSON: {e}")))?;
    let root = as_object(&value, "$")?;

    let notes = parse_notes(root)?;
    let mcqs = parse_list(root, "mcqs", MCQ_COUNT, parse_mcq)?;
    let flashcards = parse_list(root, "flashcards", FLASHCARD_COUNT, parse_flashcard)?;

    Ok(StudyMaterial {
        notes,
        mcqs,
        flashcards,
    })
}

fn parse_notes(root: &Map<String, Value>) -> ParseResult<Vec<String>> {
    let notes = required_array(root, "notes", "notes")?;
    if notes.is_empty() {
        return Err(MalformedResponse::new("notes", "expected at least one note"));
    }

    notes
        .iter()
        .enumerate()
        .map(|(i, note)| non_empty_string(note, &format!("notes[{i}]")))
        .collect()
}

fn parse_list<T>(
    root: &Map<String, Value>,
    key: &str,
    count: usize,
    parse_item: fn(&Value, &str) -> ParseResult<T>,
) -> ParseResult<Vec<T>> {
    let items = required_array(root, key, key)?;
    if items.len() < count {
        return Err(MalformedResponse::new(
            key,
            format!("expected {count} entries, got {}", items.len()),
        ));
    }

    items
        .iter()
        .take(count)
        .enumerate()
        .map(|(i, item)| parse_item(item, &format!("{key}[{i}]")))
        .collect()
}

fn parse_mcq(value: &Value, path: &str) -> ParseResult<Mcq> {
    let object = as_object(value, path)?;
    let question = required_string(object, "question", path)?;

    let options_path = format!("{path}.options");
    let options = required_array(object, "options", &options_path)?;
    if options.len() != OPTION_COUNT {
        return Err(MalformedResponse::new(
            options_path,
            format!("expected {OPTION_COUNT} options, got {}", options.len()),
        ));
    }

    let split = options
        .iter()
        .enumerate()
        .map(|(i, option)| {
            let option_path = format!("{options_path}[{i}]");
            let text = non_empty_string(option, &option_path)?;
            let (label, body) = split_option_label(&text);
            if body.is_empty() {
                return Err(MalformedResponse::new(option_path, "label without option text"));
            }
            Ok((label, body.to_string()))
        })
        .collect::<ParseResult<Vec<_>>>()?;
    let options = place_options(split, &options_path)?;

    let answer_path = format!("{path}.answer");
    let answer = match object.get("answer") {
        None | Some(Value::Null) => {
            return Err(MalformedResponse::new(answer_path, "missing field"));
        }
        Some(Value::String(raw)) => normalize_answer(raw).ok_or_else(|| {
            MalformedResponse::new(&answer_path, format!("'{raw}' is not one of A, B, C, D"))
        })?,
        Some(other) => {
            return Err(MalformedResponse::new(
                answer_path,
                format!("expected a string, got {}", type_name(other)),
            ));
        }
    };

    Ok(Mcq {
        question,
        options,
        answer,
    })
}

fn parse_flashcard(value: &Value, path: &str) -> ParseResult<Flashcard> {
    let object = as_object(value, path)?;
    Ok(Flashcard {
        front: required_string(object, "front", path)?,
        back: required_string(object, "back", path)?,
    })
}

/// Accepts `"B"`, `"b"`, `"B)"`, `"B."`, and `"B) option text"`.
fn normalize_answer(raw: &str) -> Option<AnswerLetter> {
    let mut chars = raw.trim().chars();
    let letter = chars.next()?;
    match chars.next() {
        None | Some(')') | Some('.') => AnswerLetter::from_char(letter),
        Some(_) => None,
    }
}

/// Split a leading `X)`, `X.`, `(X)`, `X:` or `X -` label off an option.
///
/// `.`, `:` and `-` only count as a label when followed by whitespace, so
/// text such as `A.M. radio` stays whole.
fn split_option_label(text: &str) -> (Option<AnswerLetter>, &str) {
    let (letter, rest) = match text.strip_prefix('(') {
        Some(inner) => {
            let mut chars = inner.chars();
            match (chars.next(), chars.next()) {
                (Some(c), Some(')')) => (c, chars.as_str()),
                _ => return (None, text),
            }
        }
        None => {
            let mut chars = text.chars();
            let Some(c) = chars.next() else {
                return (None, text);
            };
            let after = chars.as_str();
            if let Some(rest) = after.strip_prefix(')') {
                (c, rest)
            } else if let Some(rest) = after
                .strip_prefix(['.', ':'])
                .or_else(|| after.strip_prefix(" -"))
                .filter(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
            {
                (c, rest)
            } else {
                return (None, text);
            }
        }
    };

    match AnswerLetter::from_char(letter) {
        Some(letter) => (Some(letter), rest.trim()),
        None => (None, text),
    }
}

/// Put options in label order and give each a canonical `X) ` label.
///
/// A full set of four distinct labels is sorted by label, since the answer
/// letter refers to labels. Otherwise a labelled option must sit at the
/// position its letter names; unlabelled options keep their position.
fn place_options(
    split: Vec<(Option<AnswerLetter>, String)>,
    path: &str,
) -> ParseResult<[String; OPTION_COUNT]> {
    let fully_labelled = split.iter().all(|(label, _)| label.is_some());
    let mut options: [Option<String>; OPTION_COUNT] = Default::default();

    for (position, (label, body)) in split.into_iter().enumerate() {
        let slot = match label {
            Some(letter) if fully_labelled => letter.index(),
            Some(letter) if letter.index() != position => {
                return Err(MalformedResponse::new(
                    format!("{path}[{position}]"),
                    format!(
                        "labelled {letter} but listed in position {}",
                        AnswerLetter::ALL[position]
                    ),
                ));
            }
            _ => position,
        };
        if options[slot].is_some() {
            return Err(MalformedResponse::new(
                format!("{path}[{position}]"),
                format!("duplicate label {}", AnswerLetter::ALL[slot]),
            ));
        }
        options[slot] = Some(format!("{}) {body}", AnswerLetter::ALL[slot]));
    }

    let [Some(a), Some(b), Some(c), Some(d)] = options else {
        return Err(MalformedResponse::new(path, "expected one option per letter"));
    };
    Ok([a, b, c, d])
}

// ============================================================================
// Value helpers
// ============================================================================

fn as_object<'a>(value: &'a Value, path: &str) -> ParseResult<&'a Map<String, Value>> {
    value.as_object().ok_or_else(|| {
        MalformedResponse::new(path, format!("expected an object, got {}", type_name(value)))
    })
}

fn required_array<'a>(
    object: &'a Map<String, Value>,
    key: &str,
    path: &str,
) -> ParseResult<&'a [Value]> {
    match object.get(key) {
        Some(Value::Array(items)) => Ok(items),
        None | Some(Value::Null) => Err(MalformedResponse::new(path, "missing field")),
        Some(other) => Err(MalformedResponse::new(
            path,
            format!("expected an array, got {}", type_name(other)),
        )),
    }
}

fn required_string(object: &Map<String, Value>, key: &str, parent: &str) -> ParseResult<String> {
    let path = format!("{parent}.{key}");
    match object.get(key) {
        None | Some(Value::Null) => Err(MalformedResponse::new(path, "missing field")),
        Some(value) => non_empty_string(value, &path),
    }
}

fn non_empty_string(value: &Value, path: &str) -> ParseResult<String> {
    let text = value.as_str().ok_or_else(|| {
        MalformedResponse::new(path, format!("expected a string, got {}", type_name(value)))
    })?;

    let text = text.trim();
    if text.is_empty() {
        return Err(MalformedResponse::new(path, "must not be empty"));
    }
    Ok(text.to_string())
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
