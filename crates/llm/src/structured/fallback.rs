use studio_core::{
    Flashcard, InfographicDocument, InfographicSection, SourceDocument, DEFAULT_CONCLUSION,
    DEFAULT_ICON,
};

/// The heuristic never produces more cards than this.
pub const MAX_FALLBACK_CARDS: usize = 10;

/// Sentences must be longer than this many chars to become a card.
const MIN_SENTENCE_CHARS: usize = 20;

/// Sentences must have at least this many words to become a card.
const MIN_SENTENCE_WORDS: usize = 5;

const OVERVIEW_PREVIEW_CHARS: usize = 100;
const EMPTY_SOURCE_OVERVIEW: &str = "This document contains important information.";

/// Split on `.`, `!` or `?` followed by whitespace or end of text.
/// Terminal punctuation stays with its sentence; blank pieces are dropped.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        let at_boundary = match chars.peek() {
            None => true,
            Some((_, next)) => next.is_whitespace(),
        };
        if at_boundary {
            let end = idx + c.len_utf8();
            let sentence = text[start..end].trim();
            if !sentence.is_empty() {
                sentences.push(sentence);
            }
            start = end;
        }
    }

    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }
    sentences
}

/// Cloze-style cards: the first half of each long-enough sentence is the prompt,
/// the whole sentence is the answer.
pub fn fallback_flashcards(text: &str) -> Vec<Flashcard> {
    split_sentences(text)
        .into_iter()
        .filter_map(|sentence| {
            let words: Vec<&str> = sentence.split_whitespace().collect();
            if sentence.chars().count() <= MIN_SENTENCE_CHARS || words.len() < MIN_SENTENCE_WORDS {
                return None;
            }
            let lead = words[..words.len() / 2].join(" ");
            Some(Flashcard::new(format!("Complete the following: {lead}..."), sentence))
        })
        .take(MAX_FALLBACK_CARDS)
        .collect()
}

/// Single-section summary: title from the source name, body from its opening text.
pub fn fallback_infographic(source: &SourceDocument) -> InfographicDocument {
    let content = if source.is_blank() {
        EMPTY_SOURCE_OVERVIEW.to_string()
    } else {
        let preview: String = source.text.trim().chars().take(OVERVIEW_PREVIEW_CHARS).collect();
        format!("{preview}...")
    };

    InfographicDocument {
        title: format!("Summary of {}", display_name(source)),
        sections: vec![InfographicSection {
            heading: "Document Overview".to_string(),
            content,
            icon: DEFAULT_ICON.to_string(),
        }],
        statistics: Vec::new(),
        conclusion: DEFAULT_CONCLUSION.to_string(),
    }
}

fn display_name(source: &SourceDocument) -> &str {
    if source.name.trim().is_empty() {
        "document"
    } else {
        &source.name
    }
}
