//! Word (.docx) reading and text-only writing via docx-rs.
//!
//! A .docx is a ZIP of XML parts; docx-rs exposes it as
//! Document → Paragraph → Run → Text. Tables, images and styling are ignored.

use std::io::Cursor;

use docx_rs::{read_docx, Docx, DocumentChild, Paragraph, ParagraphChild, Run, RunChild};

use super::{ExtractionError, PageContent};

pub fn extract_docx(bytes: &[u8]) -> Result<Vec<PageContent>, ExtractionError> {
    let docx = read_docx(bytes).map_err(|e| ExtractionError::DocxError(e.to_string()))?;

    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(para) => Some(paragraph_text(para)),
            _ => None,
        })
        .filter(|text| !text.trim().is_empty())
        .collect();

    Ok(vec![PageContent {
        page_number: 1,
        text: paragraphs.join("\n\n"),
    }])
}

/// Runs within a paragraph are fragments of the same sentence, so no separator.
fn paragraph_text(para: &Paragraph) -> String {
    let mut text = String::new();
    for child in &para.children {
        if let ParagraphChild::Run(run) = child {
            for rc in &run.children {
                match rc {
                    RunChild::Text(t) => text.push_str(&t.text),
                    RunChild::Tab(_) => text.push('\t'),
                    RunChild::Break(_) => text.push('\n'),
                    _ => {}
                }
            }
        }
    }
    text
}

/// Build a text-only .docx with one paragraph per blank-line-separated block.
/// Single newlines inside a block are PDF line wraps and become spaces.
pub fn write_docx(text: &str) -> Result<Vec<u8>, ExtractionError> {
    let mut docx = Docx::new();
    for block in text.split("\n\n") {
        let joined = block
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if joined.is_empty() {
            continue;
        }
        docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(joined)));
    }

    let mut buf = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buf)
        .map_err(|e| ExtractionError::DocxError(e.to_string()))?;
    Ok(buf.into_inner())
}
