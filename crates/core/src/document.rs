use serde::{Deserialize, Serialize};

/// Request-scoped input to generation: a display name plus its text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceDocument {
    /// Sanitized filename (or URL-derived name) the text came from.
    pub name: String,
    pub text: String,
}

impl SourceDocument {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    /// Name without its final extension, e.g. "lecture-3.pdf" -> "lecture-3".
    pub fn stem(&self) -> &str {
        match self.name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => &self.name,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stem_strips_last_extension_only() {
        assert_eq!(SourceDocument::new("notes.v2.pdf", "").stem(), "notes.v2");
        assert_eq!(SourceDocument::new("README", "").stem(), "README");
        assert_eq!(SourceDocument::new(".env", "").stem(), ".env");
    }

    #[test]
    fn blank_means_whitespace_only() {
        assert!(SourceDocument::new("a.txt", " \n\t").is_blank());
        assert!(!SourceDocument::new("a.txt", " x ").is_blank());
    }

    #[test]
    fn char_count_counts_chars_not_bytes() {
        assert_eq!(SourceDocument::new("a.txt", "héllo").char_count(), 5);
    }
}
