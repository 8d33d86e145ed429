use serde_json::json;
use studio_core::{Flashcard, InfographicDocument, SourceDocument, DEFAULT_CONCLUSION, DEFAULT_ICON};

use super::*;

fn source(text: &str) -> SourceDocument {
    SourceDocument::new("notes.txt", text)
}

const PARIS: &str =
    "Paris is the capital of France. It has a population of over two million people.";

// ── Bracket scan ─────────────────────────────────────────────

#[test]
fn bracket_scan_spans_first_open_to_last_close() {
    let raw = "Sure! [1, [2]] and also ] trailing";
    assert_eq!(bracket_scan(raw, '[', ']'), Some("[1, [2]] and also ]"));
}

#[test]
fn bracket_scan_needs_both_delimiters_in_order() {
    assert_eq!(bracket_scan("no brackets", '{', '}'), None);
    assert_eq!(bracket_scan("} backwards {", '{', '}'), None);
    assert_eq!(bracket_scan("only { open", '{', '}'), None);
}

// ── Flashcards ───────────────────────────────────────────────

#[test]
fn flashcard_array_in_prose_is_returned_unmodified() {
    let raw = r#"Here are your flashcards:
```json
[
  {"question": "What is mitosis?", "answer": "Cell division."},
  {"question": "  Spaced?  ", "answer": ""}
]
```
Good luck studying!"#;

    let cards: Vec<Flashcard> = extract(raw, &source(PARIS));
    assert_eq!(
        cards,
        vec![
            Flashcard::new("What is mitosis?", "Cell division."),
            Flashcard::new("  Spaced?  ", ""),
        ]
    );
}

#[test]
fn flashcard_array_beyond_ten_is_not_capped() {
    let items: Vec<_> = (0..12)
        .map(|i| json!({"question": format!("Q{i}"), "answer": format!("A{i}")}))
        .collect();
    let raw = serde_json::to_string(&items).unwrap();

    let cards: Vec<Flashcard> = extract(&raw, &source(PARIS));
    assert_eq!(cards.len(), 12);
}

#[test]
fn numeric_answer_is_kept_as_text() {
    let raw = r#"[{"question":"When did WWII end?","answer":1945}]"#;
    let cards: Vec<Flashcard> = extract(raw, &source(PARIS));
    assert_eq!(cards, vec![Flashcard::new("When did WWII end?", "1945")]);
}

#[test]
fn extra_flashcard_keys_survive_the_round_trip() {
    let raw = r#"[{"question":"Q","answer":"A","difficulty":"easy"}]"#;
    let cards: Vec<Flashcard> = extract(raw, &source(PARIS));

    assert_eq!(
        serde_json::to_value(&cards).unwrap(),
        json!([{"question": "Q", "answer": "A", "difficulty": "easy"}])
    );
}

#[test]
fn wrong_flashcard_shape_falls_back() {
    let raw = r#"[{"front": "Q", "back": "A"}]"#;
    assert!(matches!(
        try_parse::<Vec<Flashcard>>(raw, &source(PARIS)),
        Err(ParseError::WrongShape(_))
    ));

    let cards: Vec<Flashcard> = extract(raw, &source(PARIS));
    assert_eq!(cards, fallback_flashcards(PARIS));
}

#[test]
fn malformed_flashcard_json_falls_back() {
    let raw = r#"[{"question": "Q", "answer": "A",}"#;
    let cards: Vec<Flashcard> = extract(raw, &source(PARIS));
    assert_eq!(cards.len(), 2);
    assert_eq!(cards[0].answer, "Paris is the capital of France.");
}

#[test]
fn prose_reply_falls_back_to_source_sentences() {
    let raw = "I'm sorry, I can only describe the document: it is about Paris.";
    let cards: Vec<Flashcard> = extract(raw, &source(PARIS));

    let answers: Vec<&str> = cards.iter().map(|c| c.answer.as_str()).collect();
    assert!(answers.contains(&"Paris is the capital of France."));
    assert!(answers.contains(&"It has a population of over two million people."));
    assert_eq!(cards[0].question, "Complete the following: Paris is the...");
}

// ── Heuristic flashcards ─────────────────────────────────────

#[test]
fn split_sentences_keeps_punctuation_and_ignores_inner_dots() {
    let text = "Version 2.5 shipped today! Did it work? Yes.\nNext line without end";
    assert_eq!(
        split_sentences(text),
        vec![
            "Version 2.5 shipped today!",
            "Did it work?",
            "Yes.",
            "Next line without end",
        ]
    );
}

#[test]
fn short_sentences_never_become_cards() {
    // Four words, over 20 chars: rejected on word count.
    // Five words, under 20 chars: rejected on length.
    let text = "Photosynthesis converts sunlight energy. A b c d e. \
                Chlorophyll absorbs red and blue light.";
    let cards = fallback_flashcards(text);
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].answer, "Chlorophyll absorbs red and blue light.");
    assert!(cards.iter().all(|c| c.answer.split_whitespace().count() >= 5));
}

#[test]
fn heuristic_caps_at_ten_cards() {
    let text = (0..25)
        .map(|i| format!("Sentence number {i} has enough words in it."))
        .collect::<Vec<_>>()
        .join(" ");
    let cards = fallback_flashcards(&text);
    assert_eq!(cards.len(), MAX_FALLBACK_CARDS);
    assert_eq!(cards[9].answer, "Sentence number 9 has enough words in it.");
}

#[test]
fn heuristic_on_empty_text_is_empty() {
    assert!(fallback_flashcards("").is_empty());
}

// ── Infographic ──────────────────────────────────────────────

#[test]
fn missing_statistics_defaults_to_empty_and_keeps_the_rest() {
    let raw = r#"Here it is: {"title": "Cells", "sections": [{"heading": "Mitosis", "content": "Division.", "icon": "dna"}], "conclusion": "Cells divide."} Enjoy."#;
    let doc: InfographicDocument = extract(raw, &source(PARIS));

    assert_eq!(doc.title, "Cells");
    assert_eq!(doc.sections.len(), 1);
    assert_eq!(doc.sections[0].heading, "Mitosis");
    assert_eq!(doc.sections[0].icon, "dna");
    assert!(doc.statistics.is_empty());
    assert_eq!(doc.conclusion, "Cells divide.");
}

#[test]
fn missing_title_and_null_fields_get_defaults() {
    let raw = r#"{"sections": null, "statistics": [{"value": 72, "label": "Percent"}]}"#;
    let doc: InfographicDocument = extract(raw, &source(PARIS));

    assert_eq!(doc.title, "Key Points from notes.txt");
    assert!(doc.sections.is_empty());
    assert_eq!(doc.statistics[0].value, "72");
    assert_eq!(doc.conclusion, DEFAULT_CONCLUSION);
}

#[test]
fn null_section_and_statistic_fields_get_defaults() {
    let raw = r#"{"title":"Cells","sections":[{"heading":"Mitosis","content":"Division.","icon":null},{"heading":null,"content":null}],"statistics":[{"value":"46","label":null}]}"#;
    let doc: InfographicDocument = extract(raw, &source(PARIS));

    assert_eq!(doc.title, "Cells");
    assert_eq!(doc.sections.len(), 2);
    assert_eq!(doc.sections[0].heading, "Mitosis");
    assert_eq!(doc.sections[0].icon, DEFAULT_ICON);
    assert_eq!(doc.sections[1].heading, "");
    assert_eq!(doc.sections[1].content, "");
    assert_eq!(doc.statistics[0].value, "46");
    assert_eq!(doc.statistics[0].label, "");
}

#[test]
fn repair_is_idempotent() {
    let src = source(PARIS);
    let parsed = json!({"title": "T", "sections": [{"heading": null}], "statistics": [{}]});

    let once = repair_infographic(parsed, &src);
    let twice = repair_infographic(once.clone(), &src);
    assert_eq!(once, twice);

    let doc: InfographicDocument = extract(&once.to_string(), &src);
    let again: InfographicDocument = extract(&serde_json::to_string(&doc).unwrap(), &src);
    assert_eq!(doc, again);
}

#[test]
fn repair_leaves_non_objects_alone() {
    let src = source(PARIS);
    assert_eq!(repair_infographic(json!([1, 2]), &src), json!([1, 2]));
}

#[test]
fn sections_of_the_wrong_type_fall_back() {
    let raw = r#"{"title": "T", "sections": "one, two, three"}"#;
    let doc: InfographicDocument = extract(raw, &source(PARIS));
    assert_eq!(doc.title, "Summary of notes.txt");
}

#[test]
fn no_braces_always_yields_titled_single_section() {
    for raw in ["", "plain prose answer", "]]] [[["] {
        let doc: InfographicDocument = extract(raw, &source(PARIS));
        assert!(!doc.title.is_empty());
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].heading, "Document Overview");
        assert_eq!(doc.sections[0].icon, "file-text");
        assert!(doc.statistics.is_empty());
    }
}

#[test]
fn infographic_fallback_previews_first_hundred_chars() {
    let text = "x".repeat(250);
    let doc = fallback_infographic(&SourceDocument::new("long.pdf", text));
    assert_eq!(doc.title, "Summary of long.pdf");
    assert_eq!(doc.sections[0].content, format!("{}...", "x".repeat(100)));
}

#[test]
fn infographic_fallback_on_blank_source_still_has_content() {
    let doc = fallback_infographic(&SourceDocument::new("", "   "));
    assert_eq!(doc.title, "Summary of document");
    assert!(!doc.sections[0].content.is_empty());
    assert_eq!(doc.conclusion, DEFAULT_CONCLUSION);
}
