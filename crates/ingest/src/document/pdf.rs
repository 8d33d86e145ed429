use super::{ExtractionError, PageContent};

pub fn extract_pdf(bytes: &[u8]) -> Result<Vec<PageContent>, ExtractionError> {
    // pdf-extract panics on some malformed files instead of returning an error.
    let text = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes))
        .map_err(|_| ExtractionError::PdfError("malformed PDF".into()))?
        .map_err(|e| ExtractionError::PdfError(e.to_string()))?;

    let trimmed = text.trim();
    if trimmed.is_empty() {
        // Scanned/image-only PDF. No OCR here; callers decide what empty means.
        tracing::warn!("PDF contains no text layer ({} bytes)", bytes.len());
        return Ok(vec![PageContent {
            page_number: 1,
            text: String::new(),
        }]);
    }

    Ok(split_pages(&text))
}

/// pdf-extract returns all text as one string with form feeds between pages.
fn split_pages(text: &str) -> Vec<PageContent> {
    if !text.contains('\x0C') {
        return vec![PageContent {
            page_number: 1,
            text: text.trim().to_string(),
        }];
    }

    text.split('\x0C')
        .enumerate()
        .filter(|(_, page_text)| !page_text.trim().is_empty())
        .map(|(i, page_text)| PageContent {
            page_number: i + 1,
            text: page_text.trim().to_string(),
        })
        .collect()
}
