//! Study material produced by the generation pipeline.
//!
//! SRP: wire shapes for flashcards and infographics.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Conclusion used whenever the model omits one.
pub const DEFAULT_CONCLUSION: &str = "See document for complete details.";

/// Icon used for synthesized sections.
pub const DEFAULT_ICON: &str = "file-text";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flashcard {
    #[serde(deserialize_with = "string_or_number")]
    pub question: String,
    #[serde(deserialize_with = "string_or_number")]
    pub answer: String,
    /// Any other keys the model attached to the card, passed through as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Flashcard {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfographicDocument {
    pub title: String,
    pub sections: Vec<InfographicSection>,
    #[serde(default)]
    pub statistics: Vec<Statistic>,
    #[serde(default = "default_conclusion")]
    pub conclusion: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfographicSection {
    #[serde(default)]
    pub heading: String,
    #[serde(default)]
    pub content: String,
    #[serde(default = "default_icon")]
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistic {
    /// Models emit both `"42%"` and `42`; both end up as text.
    #[serde(deserialize_with = "string_or_number")]
    pub value: String,
    #[serde(default)]
    pub label: String,
}

fn default_conclusion() -> String {
    DEFAULT_CONCLUSION.to_string()
}

fn default_icon() -> String {
    DEFAULT_ICON.to_string()
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Null => Ok(String::new()),
        other => Ok(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_statistic_value_becomes_text() {
        let stat: Statistic = serde_json::from_value(json!({"value": 42.5, "label": "Growth"})).unwrap();
        assert_eq!(stat.value, "42.5");
        assert_eq!(stat.label, "Growth");
    }

    #[test]
    fn section_tolerates_missing_icon() {
        let section: InfographicSection =
            serde_json::from_value(json!({"heading": "Intro", "content": "Text"})).unwrap();
        assert_eq!(section.icon, DEFAULT_ICON);
    }

    #[test]
    fn infographic_requires_title_and_sections() {
        let missing_title = json!({"sections": []});
        assert!(serde_json::from_value::<InfographicDocument>(missing_title).is_err());

        let minimal: InfographicDocument =
            serde_json::from_value(json!({"title": "T", "sections": []})).unwrap();
        assert!(minimal.statistics.is_empty());
        assert_eq!(minimal.conclusion, DEFAULT_CONCLUSION);
    }

    #[test]
    fn numeric_flashcard_answer_becomes_text() {
        let card: Flashcard =
            serde_json::from_value(json!({"question": "When did WWII end?", "answer": 1945})).unwrap();
        assert_eq!(card, Flashcard::new("When did WWII end?", "1945"));
    }

    #[test]
    fn flashcard_keeps_unknown_keys() {
        let input = json!({"question": "Q", "answer": "A", "difficulty": "easy", "tags": ["bio"]});
        let card: Flashcard = serde_json::from_value(input.clone()).unwrap();

        assert_eq!(card.extra["difficulty"], "easy");
        assert_eq!(serde_json::to_value(&card).unwrap(), input);
    }

    #[test]
    fn flashcard_without_answer_is_rejected() {
        assert!(serde_json::from_value::<Flashcard>(json!({"question": "Q"})).is_err());
    }

    #[test]
    fn flashcard_serializes_with_plain_field_names() {
        let card = Flashcard::new("Q?", "A.");
        assert_eq!(serde_json::to_value(&card).unwrap(), json!({"question": "Q?", "answer": "A."}));
    }
}
