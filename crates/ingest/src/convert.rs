//! In-memory file conversion between the formats the converter endpoint offers.
//!
//! Only text survives a conversion. Layout, tables and images are dropped, and
//! the two conversions with no real implementation return a short note file.

use thiserror::Error;
use tracing::info;

use crate::document::{extract_as, write_docx, ExtractionError};

pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

const DOCX_TO_PDF_NOTE: &str = "This conversion is not fully implemented yet.";
const IMAGE_TO_TEXT_NOTE: &str = "Text extraction would happen here in production.";

#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("Conversion not supported yet")]
    Unsupported { source_format: String, target_format: String },
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}

/// A converted file ready to be sent as an attachment.
#[derive(Debug, Clone)]
pub struct ConvertedFile {
    pub filename: &'static str,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ConvertedFile {
    fn text(filename: &'static str, body: impl Into<String>) -> Self {
        Self {
            filename,
            content_type: TEXT_CONTENT_TYPE,
            bytes: body.into().into_bytes(),
        }
    }
}

/// Convert `bytes` from `source_format` to `target_format`.
///
/// Formats are compared case-insensitively. Any source format containing
/// "image" (e.g. `image/png`) converts to `txt`.
pub fn convert(
    bytes: &[u8],
    filename: &str,
    source_format: &str,
    target_format: &str,
) -> Result<ConvertedFile, ConversionError> {
    let source = source_format.trim().to_lowercase();
    let target = target_format.trim().to_lowercase();
    info!("Converting '{}' ({} bytes): {} -> {}", filename, bytes.len(), source, target);

    match (source.as_str(), target.as_str()) {
        ("pdf", "docx") => {
            let text = extract_as(bytes, filename, "pdf")?.full_text();
            Ok(ConvertedFile {
                filename: "converted.docx",
                content_type: DOCX_CONTENT_TYPE,
                bytes: write_docx(&text)?,
            })
        }
        ("pdf", "txt") | ("docx", "txt") => {
            let text = extract_as(bytes, filename, &source)?.full_text();
            Ok(ConvertedFile::text("converted.txt", text))
        }
        ("docx", "pdf") => Ok(ConvertedFile::text("conversion_note.txt", DOCX_TO_PDF_NOTE)),
        (s, "txt") if s.contains("image") => {
            Ok(ConvertedFile::text("extracted_text.txt", IMAGE_TO_TEXT_NOTE))
        }
        _ => Err(ConversionError::Unsupported {
            source_format: source,
            target_format: target,
        }),
    }
}
