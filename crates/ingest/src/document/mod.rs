mod docx;
mod html;
mod pdf;
mod txt;

pub use docx::write_docx;
pub use html::strip_html;

use studio_core::SourceDocument;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),
    #[error("PDF extraction failed: {0}")]
    PdfError(String),
    #[error("DOCX extraction failed: {0}")]
    DocxError(String),
}

/// A page of extracted text.
#[derive(Debug, Clone)]
pub struct PageContent {
    /// 1-based page number (for PDFs). Everything else is a single page.
    pub page_number: usize,
    pub text: String,
}

/// Result of extracting text from a document.
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    /// Original filename.
    pub filename: String,
    /// File type: "pdf", "docx", "txt", "md", "html"
    pub file_type: String,
    pub pages: Vec<PageContent>,
}

impl ExtractedDocument {
    /// Get all text concatenated, one blank line between pages.
    pub fn full_text(&self) -> String {
        self.pages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Total character count across all pages.
    pub fn total_chars(&self) -> usize {
        self.pages.iter().map(|p| p.text.chars().count()).sum()
    }

    pub fn into_source(self) -> SourceDocument {
        let text = self.full_text();
        SourceDocument::new(self.filename, text)
    }
}

/// Lowercased extension of `filename`, or "" when it has none.
pub fn file_extension(filename: &str) -> String {
    match filename.rsplit_once('.') {
        Some((_, ext)) => ext.to_lowercase(),
        None => String::new(),
    }
}

/// Extract text from file bytes based on the filename's extension.
pub fn extract_text(bytes: &[u8], filename: &str) -> Result<ExtractedDocument, ExtractionError> {
    let ext = file_extension(filename);
    extract_as(bytes, filename, &ext)
}

/// Extract text treating the bytes as `file_type` regardless of filename.
pub fn extract_as(
    bytes: &[u8],
    filename: &str,
    file_type: &str,
) -> Result<ExtractedDocument, ExtractionError> {
    let (file_type, pages) = match file_type {
        "pdf" => ("pdf", pdf::extract_pdf(bytes)?),
        "docx" => ("docx", docx::extract_docx(bytes)?),
        "txt" | "text" => ("txt", txt::extract_txt(bytes)),
        "md" | "markdown" => ("md", txt::extract_txt(bytes)),
        "html" | "htm" => ("html", html::extract_html(bytes)),
        "" => return Err(ExtractionError::UnsupportedType("(no extension)".into())),
        other => return Err(ExtractionError::UnsupportedType(other.to_string())),
    };

    Ok(ExtractedDocument {
        filename: filename.to_string(),
        file_type: file_type.to_string(),
        pages,
    })
}
