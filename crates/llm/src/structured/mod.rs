//! Recover typed study material from free-form model output.
//!
//! Two tiers: a bracket-scan parse of the payload embedded in the reply (with
//! field-level repair for infographics), then a deterministic heuristic built
//! from the source text when nothing parseable is found. `extract` never fails.

mod fallback;
#[cfg(test)]
mod tests;

pub use fallback::{fallback_flashcards, fallback_infographic, split_sentences, MAX_FALLBACK_CARDS};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use studio_core::{Flashcard, InfographicDocument, SourceDocument, DEFAULT_CONCLUSION, DEFAULT_ICON};
use tracing::{debug, warn};

/// Why the first tier gave up. Only ever logged.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("no '{open}'...'{close}' region in response")]
    NoPayload { open: char, close: char },
    #[error("payload is not valid JSON: {0}")]
    InvalidJson(serde_json::Error),
    #[error("payload does not match the expected shape: {0}")]
    WrongShape(serde_json::Error),
}

/// A shape the extractor can recover from model output.
pub trait Structured: DeserializeOwned {
    /// Human-readable name for logs.
    const KIND: &'static str;
    const OPEN: char;
    const CLOSE: char;

    /// Fill in defaults on a parsed payload. Must be idempotent.
    fn repair(value: Value, _source: &SourceDocument) -> Value {
        value
    }

    /// Deterministic best effort built from the source text alone.
    fn fallback(source: &SourceDocument) -> Self;
}

impl Structured for Vec<Flashcard> {
    const KIND: &'static str = "flashcards";
    const OPEN: char = '[';
    const CLOSE: char = ']';

    fn fallback(source: &SourceDocument) -> Self {
        fallback_flashcards(&source.text)
    }
}

impl Structured for InfographicDocument {
    const KIND: &'static str = "infographic";
    const OPEN: char = '{';
    const CLOSE: char = '}';

    fn repair(value: Value, source: &SourceDocument) -> Value {
        repair_infographic(value, source)
    }

    fn fallback(source: &SourceDocument) -> Self {
        fallback_infographic(source)
    }
}

/// Slice from the first `open` to the last `close`, inclusive.
///
/// Heuristic: prose around the payload containing the same delimiters can
/// widen the slice and make the parse fail.
pub fn bracket_scan(raw: &str, open: char, close: char) -> Option<&str> {
    let start = raw.find(open)?;
    let end = raw.rfind(close)?;
    if end < start {
        return None;
    }
    Some(&raw[start..end + close.len_utf8()])
}

/// First tier only: bracket scan, JSON parse, repair, typed decode.
pub fn try_parse<T: Structured>(raw: &str, source: &SourceDocument) -> Result<T, ParseError> {
    let payload = bracket_scan(raw, T::OPEN, T::CLOSE).ok_or(ParseError::NoPayload {
        open: T::OPEN,
        close: T::CLOSE,
    })?;
    let value: Value = serde_json::from_str(payload).map_err(ParseError::InvalidJson)?;
    let value = T::repair(value, source);
    serde_json::from_value(value).map_err(ParseError::WrongShape)
}

/// Recover a `T` from `raw`, falling back to the source-text heuristic.
pub fn extract<T: Structured>(raw: &str, source: &SourceDocument) -> T {
    match try_parse::<T>(raw, source) {
        Ok(parsed) => {
            debug!("Parsed {} payload for '{}'", T::KIND, source.name);
            parsed
        }
        Err(e) => {
            warn!("Falling back to heuristic {} for '{}': {}", T::KIND, source.name, e);
            T::fallback(source)
        }
    }
}

/// Default any missing or null infographic field, top level and per item.
///
/// Present fields are left untouched, including their types: a `sections`
/// that is not an array still fails the typed decode afterwards.
pub fn repair_infographic(mut value: Value, source: &SourceDocument) -> Value {
    let Some(obj) = value.as_object_mut() else {
        return value;
    };
    default_field(obj, "title", || Value::String(format!("Key Points from {}", source.name)));
    default_field(obj, "sections", || Value::Array(Vec::new()));
    default_field(obj, "statistics", || Value::Array(Vec::new()));
    default_field(obj, "conclusion", || Value::String(DEFAULT_CONCLUSION.to_string()));

    for section in items_mut(obj, "sections") {
        default_field(section, "heading", empty_string);
        default_field(section, "content", empty_string);
        default_field(section, "icon", || Value::String(DEFAULT_ICON.to_string()));
    }
    for stat in items_mut(obj, "statistics") {
        default_field(stat, "value", empty_string);
        default_field(stat, "label", empty_string);
    }
    value
}

/// Object entries of the array under `key`; other entries are skipped.
fn items_mut<'a>(
    obj: &'a mut Map<String, Value>,
    key: &str,
) -> impl Iterator<Item = &'a mut Map<String, Value>> {
    obj.get_mut(key)
        .and_then(Value::as_array_mut)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object_mut)
}

fn empty_string() -> Value {
    Value::String(String::new())
}

fn default_field(obj: &mut Map<String, Value>, key: &str, default: impl FnOnce() -> Value) {
    match obj.get(key) {
        Some(v) if !v.is_null() => {}
        _ => {
            obj.insert(key.to_string(), default());
        }
    }
}
