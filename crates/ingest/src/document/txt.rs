use super::PageContent;

pub fn extract_txt(bytes: &[u8]) -> Vec<PageContent> {
    // Try UTF-8 first, fall back to lossy conversion
    let text = match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => String::from_utf8_lossy(bytes).into_owned(),
    };

    vec![PageContent {
        page_number: 1,
        text: text.trim().to_string(),
    }]
}
