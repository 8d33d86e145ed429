//! Download a document from a URL and extract its text.

use std::time::Duration;

use futures::StreamExt;
use thiserror::Error;
use tracing::info;
use url::Url;

use crate::document::{extract_as, ExtractedDocument, ExtractionError};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid URL format")]
    InvalidUrl,
    #[error("timed out after {secs}s fetching {url}")]
    Timeout { url: String, secs: u64 },
    #[error("download of {url} failed: {reason}")]
    DownloadFailed { url: String, reason: String },
    #[error("{url} is larger than the {limit_bytes}-byte download limit")]
    TooLarge { url: String, limit_bytes: usize },
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}

/// Only absolute http(s) URLs are accepted.
pub fn validate_url(raw: &str) -> Result<Url, FetchError> {
    let raw = raw.trim();
    if !(raw.starts_with("http://") || raw.starts_with("https://")) {
        return Err(FetchError::InvalidUrl);
    }
    let url = Url::parse(raw).map_err(|_| FetchError::InvalidUrl)?;
    if url.host_str().is_none() {
        return Err(FetchError::InvalidUrl);
    }
    Ok(url)
}

/// Name shown for a fetched document: last non-empty path segment, else the host.
pub fn name_for_url(url: &Url) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
        .map(str::to_string)
        .or_else(|| url.host_str().map(str::to_string))
        .unwrap_or_else(|| "url_content".to_string())
}

/// Fetch `raw_url` and extract text from the body.
///
/// The body type is sniffed: `%PDF` magic means PDF, an HTML content type or
/// leading markup means HTML, anything else is read as plain text. Bodies
/// over `max_bytes` are refused, whether or not the server declares a length.
pub async fn fetch_document(
    raw_url: &str,
    timeout_secs: u64,
    max_bytes: usize,
) -> Result<ExtractedDocument, FetchError> {
    let url = validate_url(raw_url)?;
    info!("Fetching document from: {}", url);

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| FetchError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = client.get(url.clone()).send().await.map_err(|e| {
        if e.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            FetchError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    if !response.status().is_success() {
        return Err(FetchError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_lowercase();

    let too_large = || FetchError::TooLarge {
        url: url.to_string(),
        limit_bytes: max_bytes,
    };
    if response.content_length().is_some_and(|len| len > max_bytes as u64) {
        return Err(too_large());
    }

    let mut bytes: Vec<u8> = Vec::new();
    let mut body = std::pin::pin!(response.bytes_stream());
    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(|e| FetchError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        if bytes.len() + chunk.len() > max_bytes {
            return Err(too_large());
        }
        bytes.extend_from_slice(&chunk);
    }

    let kind = sniff_kind(&bytes, &content_type);
    let name = name_for_url(&url);
    info!("Fetched {} bytes from {} (as {})", bytes.len(), url, kind);

    let doc = tokio::task::spawn_blocking(move || extract_as(&bytes, &name, kind))
        .await
        .map_err(|e| FetchError::DownloadFailed {
            url: url.to_string(),
            reason: format!("extraction task failed: {e}"),
        })??;

    Ok(doc)
}

fn sniff_kind(bytes: &[u8], content_type: &str) -> &'static str {
    if bytes.starts_with(b"%PDF") {
        return "pdf";
    }
    if content_type.contains("html") {
        return "html";
    }
    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(512)]).to_lowercase();
    let head = head.trim_start();
    if head.starts_with("<!doctype html") || head.starts_with("<html") {
        "html"
    } else {
        "txt"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, StatusCode};
    use axum::routing::get;
    use axum::Router;

    const LIMIT: usize = 1024 * 1024;

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[test]
    fn rejects_non_http_urls() {
        assert!(matches!(validate_url("ftp://example.com/a.pdf"), Err(FetchError::InvalidUrl)));
        assert!(matches!(validate_url("example.com"), Err(FetchError::InvalidUrl)));
        assert!(matches!(validate_url("https://"), Err(FetchError::InvalidUrl)));
        assert!(validate_url("  https://example.com/paper.pdf ").is_ok());
    }

    #[test]
    fn names_come_from_path_then_host() {
        let url = Url::parse("https://example.com/papers/intro.pdf").unwrap();
        assert_eq!(name_for_url(&url), "intro.pdf");
        let url = Url::parse("https://example.com/docs/").unwrap();
        assert_eq!(name_for_url(&url), "docs");
        let url = Url::parse("https://example.com").unwrap();
        assert_eq!(name_for_url(&url), "example.com");
    }

    #[test]
    fn sniffs_body_kind() {
        assert_eq!(sniff_kind(b"%PDF-1.7 ...", "application/octet-stream"), "pdf");
        assert_eq!(sniff_kind(b"anything", "text/html; charset=utf-8"), "html");
        assert_eq!(sniff_kind(b"  <!DOCTYPE html><p>x</p>", "text/plain"), "html");
        assert_eq!(sniff_kind(b"just words", "text/plain"), "txt");
    }

    #[tokio::test]
    async fn fetches_and_strips_html() {
        let app = Router::new().route(
            "/article",
            get(|| async {
                (
                    [(header::CONTENT_TYPE, "text/html")],
                    "<html><body><h1>Photosynthesis</h1><p>Plants convert light into energy.</p></body></html>",
                )
            }),
        );
        let base = serve(app).await;

        let doc = fetch_document(&format!("{base}/article"), 5, LIMIT).await.unwrap();
        assert_eq!(doc.filename, "article");
        assert_eq!(doc.file_type, "html");
        assert_eq!(doc.full_text(), "Photosynthesis\n\nPlants convert light into energy.");
    }

    #[tokio::test]
    async fn non_success_status_is_reported() {
        let app = Router::new().route("/missing", get(|| async { (StatusCode::NOT_FOUND, "nope") }));
        let base = serve(app).await;

        let err = fetch_document(&format!("{base}/missing"), 5, LIMIT).await.unwrap_err();
        assert!(matches!(err, FetchError::DownloadFailed { .. }));
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn declared_length_over_the_cap_is_refused() {
        let app = Router::new().route("/big.txt", get(|| async { "x".repeat(4096) }));
        let base = serve(app).await;

        let err = fetch_document(&format!("{base}/big.txt"), 5, 1024).await.unwrap_err();
        assert!(matches!(err, FetchError::TooLarge { limit_bytes: 1024, .. }));
    }

    #[tokio::test]
    async fn streamed_body_over_the_cap_is_cut_off() {
        // A streamed body carries no Content-Length, so only the running count applies.
        let app = Router::new().route(
            "/stream.txt",
            get(|| async {
                let chunks = (0..8).map(|_| Ok::<_, std::io::Error>("y".repeat(512)));
                Body::from_stream(futures::stream::iter(chunks))
            }),
        );
        let base = serve(app).await;

        let err = fetch_document(&format!("{base}/stream.txt"), 5, 1024).await.unwrap_err();
        assert!(matches!(err, FetchError::TooLarge { .. }));
        assert!(err.to_string().contains("1024-byte download limit"));

        let doc = fetch_document(&format!("{base}/stream.txt"), 5, LIMIT).await.unwrap();
        assert_eq!(doc.full_text().len(), 4096);
    }
}
