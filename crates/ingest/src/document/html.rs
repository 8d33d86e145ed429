use once_cell::sync::Lazy;
use regex::Regex;

use super::PageContent;

static SCRIPT_STYLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<(script|style|noscript|head)\b.*?</(script|style|noscript|head)>").unwrap());
static BLOCK_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</(p|div|h[1-6]|li|tr|section|article|blockquote)>|<br\s*/?>").unwrap());
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());
static INLINE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t\r\f\v]+").unwrap());
static BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n+").unwrap());

pub fn extract_html(bytes: &[u8]) -> Vec<PageContent> {
    let raw = String::from_utf8_lossy(bytes);
    vec![PageContent {
        page_number: 1,
        text: strip_html(&raw),
    }]
}

/// Reduce an HTML page to readable text: drop scripts and styles, turn block
/// ends into paragraph breaks, remove remaining tags, decode common entities.
pub fn strip_html(html: &str) -> String {
    let text = SCRIPT_STYLE.replace_all(html, " ");
    let text = BLOCK_END.replace_all(&text, "\n\n");
    let text = TAG.replace_all(&text, " ");
    let text = decode_entities(&text);

    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    let text = INLINE_WS.replace_all(&lines.join("\n"), " ").into_owned();
    BLANK_LINES.replace_all(&text, "\n\n").trim().to_string()
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_scripts_and_tags() {
        let html = r#"<html><head><title>t</title></head><body>
            <script>var x = "<p>hidden</p>";</script>
            <h1>Heading</h1><p>First <b>bold</b> point.</p><p>Second&nbsp;point &amp; more.</p>
        </body></html>"#;
        let text = strip_html(html);
        assert_eq!(text, "Heading\n\nFirst bold point.\n\nSecond point & more.");
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(strip_html("no markup here"), "no markup here");
    }
}
