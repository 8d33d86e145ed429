//! Prompt assembly for flashcard and infographic generation.
//!
//! Templates live in `prompts/*.md` next to this crate and are compiled in.
//! Each template carries exactly one `<<<content>>>` placeholder, checked when
//! the prompt set is built.

use std::borrow::Cow;

use studio_core::SourceDocument;

/// Placeholder in a template that gets replaced with the (truncated) source text.
pub const CONTENT_PLACEHOLDER: &str = "<<<content>>>";

/// Source text beyond this many chars is cut and marked with "...".
pub const MAX_SOURCE_CHARS: usize = 4000;

const FLASHCARDS_TEMPLATE: &str = include_str!("../prompts/flashcards.md");
const INFOGRAPHIC_TEMPLATE: &str = include_str!("../prompts/infographic.md");
const INFOGRAPHIC_FORMAT: &str = include_str!("../prompts/infographic_format.md");

#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    #[error("prompt template '{name}' must contain exactly one '{CONTENT_PLACEHOLDER}' placeholder, found {found}")]
    Placeholder { name: String, found: usize },
}

/// A validated template with a single content slot.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    name: String,
    text: String,
}

impl PromptTemplate {
    pub fn parse(name: impl Into<String>, text: impl Into<String>) -> Result<Self, PromptError> {
        let name = name.into();
        let text = text.into();
        let found = text.matches(CONTENT_PLACEHOLDER).count();
        if found != 1 {
            return Err(PromptError::Placeholder { name, found });
        }
        Ok(Self { name, text })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Substitute the truncated source text into the template.
    pub fn render(&self, source_text: &str) -> String {
        self.text
            .replacen(CONTENT_PLACEHOLDER, &truncate_source(source_text), 1)
            .trim_end()
            .to_string()
    }
}

/// Cap `text` at `MAX_SOURCE_CHARS` chars, appending "..." when cut.
pub fn truncate_source(text: &str) -> Cow<'_, str> {
    match text.char_indices().nth(MAX_SOURCE_CHARS) {
        Some((byte_idx, _)) => Cow::Owned(format!("{}...", &text[..byte_idx])),
        None => Cow::Borrowed(text),
    }
}

/// The full set of templates used by the generators.
#[derive(Debug, Clone)]
pub struct PromptSet {
    flashcards: PromptTemplate,
    infographic: PromptTemplate,
    infographic_format: String,
}

impl PromptSet {
    /// Load the templates compiled into this crate.
    pub fn builtin() -> Result<Self, PromptError> {
        Ok(Self {
            flashcards: PromptTemplate::parse("flashcards", FLASHCARDS_TEMPLATE)?,
            infographic: PromptTemplate::parse("infographic", INFOGRAPHIC_TEMPLATE)?,
            infographic_format: INFOGRAPHIC_FORMAT.trim().to_string(),
        })
    }

    pub fn flashcards(&self, source: &SourceDocument) -> String {
        self.flashcards.render(&source.text)
    }

    /// Build the infographic prompt.
    ///
    /// With a caller-supplied instruction, the instruction comes first and the
    /// document follows it. The output-format block is always appended last so
    /// the reply stays parseable.
    pub fn infographic(&self, source: &SourceDocument, instruction: Option<&str>) -> String {
        let body = match instruction.map(str::trim).filter(|s| !s.is_empty()) {
            Some(instruction) => format!(
                "{}\n\nDocument content:\n---\n{}\n---",
                instruction,
                truncate_source(&source.text)
            ),
            None => self.infographic.render(&source.text),
        };
        format!("{}\n\n{}", body, self.infographic_format)
    }
}
