//! Option list parsing and option-letter mapping.
//!
//! Backends hand us option lists in several shapes: a real list, a JSON
//! array string, or a bracketed comma list such as `[Paris, London, Rome]`
//! (what a `List::toString()` produces on the server). Everything here
//! degrades to an empty list instead of failing.

use serde_json::Value;

use crate::model::QuestionType;

/// Rendered options for true/false questions. Index 0 is the `true` branch.
pub const TRUE_FALSE_OPTIONS: [&str; 2] = ["Verdadeiro", "Falso"];

const QUOTES: [char; 2] = ['"', '\''];

/// The raw `answers` field of a question record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawOptions {
    List(Vec<String>),
    Text(String),
}

impl From<Vec<String>> for RawOptions {
    fn from(value: Vec<String>) -> Self {
        RawOptions::List(value)
    }
}

impl From<&str> for RawOptions {
    fn from(value: &str) -> Self {
        RawOptions::Text(value.to_string())
    }
}

/// Parse a raw option field into an ordered list of option strings.
///
/// True/false questions always get [`TRUE_FALSE_OPTIONS`]. Lists pass
/// through unchanged. Strings are parsed as JSON first and recovered
/// leniently when that fails.
pub fn parse_options(raw: &RawOptions, question_type: QuestionType) -> Vec<String> {
    if question_type == QuestionType::TrueFalse {
        return TRUE_FALSE_OPTIONS.iter().map(|s| s.to_string()).collect();
    }

    match raw {
        RawOptions::List(items) => items.clone(),
        RawOptions::Text(text) => parse_option_text(text),
    }
}

/// Parse a single option string (JSON array or bracketed list).
pub fn parse_option_text(text: &str) -> Vec<String> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(items)) => items.iter().map(value_to_text).collect(),
        Ok(_) => Vec::new(),
        Err(e) => {
            tracing::debug!("option string is not JSON ({e}), recovering leniently");
            recover_option_list(text)
        }
    }
}

/// Lenient recovery for option strings that are not valid JSON.
fn recover_option_list(text: &str) -> Vec<String> {
    let stripped = text.strip_prefix('[').unwrap_or(text);
    let stripped = stripped.strip_suffix(']').unwrap_or(stripped);
    let cleaned = stripped.trim();
    if cleaned.is_empty() {
        return Vec::new();
    }

    cleaned
        .split(',')
        .map(strip_quotes)
        .filter(|piece| !piece.is_empty() && !is_stray_punctuation(piece))
        .map(str::to_string)
        .collect()
}

/// Strip one surrounding quote on each side, then trim.
fn strip_quotes(piece: &str) -> &str {
    let piece = piece.trim();
    let piece = piece.strip_prefix(&QUOTES[..]).unwrap_or(piece);
    let piece = piece.strip_suffix(&QUOTES[..]).unwrap_or(piece);
    piece.trim()
}

/// Pieces made only of brackets and quotes carry no option text.
fn is_stray_punctuation(piece: &str) -> bool {
    piece.chars().all(|c| matches!(c, '[' | ']' | '"' | '\''))
}

/// Render a JSON array element the way a loosely-typed client would.
pub(crate) fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

/// Display letter for a zero-based option index (`0 -> 'A'`).
///
/// Not bounds checked: indices past 25 continue into the characters after
/// `Z`, which callers never render in practice.
pub fn letter_of(index: usize) -> char {
    u32::try_from(index)
        .ok()
        .and_then(|offset| offset.checked_add(u32::from(b'A')))
        .and_then(char::from_u32)
        .unwrap_or(char::REPLACEMENT_CHARACTER)
}

/// Zero-based index for an option letter, inverse of [`letter_of`].
///
/// Empty input, more than one character, or a character below `A` yields
/// `None`, which callers treat as "no matching option".
pub fn index_of(letter: &str) -> Option<usize> {
    let mut chars = letter.chars();
    let c = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    (c as u32)
        .checked_sub(u32::from(b'A'))
        .map(|offset| offset as usize)
}

/// Resolve a letter to its option text. Out-of-range letters resolve to `None`.
pub fn option_for_letter<'a>(options: &'a [String], letter: &str) -> Option<&'a str> {
    index_of(letter)
        .and_then(|i| options.get(i))
        .map(String::as_str)
}

/// Read a displayed true/false label as its branch, ignoring case and
/// surrounding whitespace. `None` for anything else.
pub fn true_false_label_value(text: &str) -> Option<bool> {
    TRUE_FALSE_OPTIONS
        .iter()
        .position(|label| label.eq_ignore_ascii_case(text.trim()))
        .map(|index| index == 0)
}

/// Split a comma-delimited tag string into trimmed, non-empty labels.
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
