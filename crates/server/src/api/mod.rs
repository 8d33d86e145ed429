//! Endpoint adapters.
//!
//! Each sub-module owns one route family. Shared error mapping and request
//! input readers live here in mod.rs.

mod converter;
pub mod doc;
mod flashcards;
mod health;
mod infographic;
mod payment;

use std::collections::HashMap;

use axum::extract::{FromRequest, Multipart, Request};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use studio_billing::BillingError;
use studio_core::SourceDocument;
use studio_ingest::convert::ConversionError;
use studio_ingest::document::extract_as;
use studio_ingest::{extract_text, sanitize_filename, ExtractionError};
use tracing::{error, warn};

/// Name used when a request gives no usable filename.
pub(crate) const DEFAULT_FILENAME: &str = "document";

// ── Errors ───────────────────────────────────────────────────────

#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Every failure an endpoint can report. Renders as `{"error": message}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Internal(String),
    #[error("{0}")]
    Unavailable(String),
}

impl ApiError {
    pub(crate) fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Internal(msg) => error!("Request failed: {}", msg),
            ApiError::Unavailable(msg) => warn!("Service unavailable: {}", msg),
            ApiError::BadRequest(_) => {}
        }
        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}

impl From<ExtractionError> for ApiError {
    fn from(e: ExtractionError) -> Self {
        match e {
            ExtractionError::UnsupportedType(_) => ApiError::bad_request("Unsupported file format"),
            other => ApiError::BadRequest(other.to_string()),
        }
    }
}

impl From<ConversionError> for ApiError {
    fn from(e: ConversionError) -> Self {
        match e {
            ConversionError::Extraction(inner) => inner.into(),
            unsupported => ApiError::BadRequest(unsupported.to_string()),
        }
    }
}

impl From<BillingError> for ApiError {
    fn from(e: BillingError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(e: tokio::task::JoinError) -> Self {
        ApiError::Internal(format!("background task failed: {e}"))
    }
}

// ── Request bodies ───────────────────────────────────────────────

/// Parse a JSON body, treating an empty body as `T::default()`.
pub(crate) fn parse_json_body<T: DeserializeOwned + Default>(body: &[u8]) -> Result<T, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {e}")))
}

/// An uploaded file as received. `filename` is the raw client value and may be empty.
pub(crate) struct Upload {
    pub filename: String,
    pub bytes: Bytes,
}

/// A multipart form: the `file` part plus every text field by name.
pub(crate) struct UploadForm {
    pub file: Option<Upload>,
    pub fields: HashMap<String, String>,
}

impl UploadForm {
    pub async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut file = None;
        let mut fields = HashMap::new();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Multipart error: {e}")))?
        {
            let name = field.name().unwrap_or_default().to_string();
            if name == "file" {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read file: {e}")))?;
                file = Some(Upload { filename, bytes });
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read field '{name}': {e}")))?;
                fields.insert(name, value);
            }
        }

        Ok(Self { file, fields })
    }

    /// First non-empty value among `names`.
    pub fn field(&self, names: &[&str]) -> Option<String> {
        names
            .iter()
            .filter_map(|n| self.fields.get(*n))
            .find(|v| !v.trim().is_empty())
            .cloned()
    }
}

/// JSON shape shared by the generation endpoints.
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct StudyRequest {
    /// Raw document text.
    #[serde(default, alias = "fileContent")]
    pub content: Option<String>,
    #[serde(default, alias = "fileName")]
    pub filename: Option<String>,
    /// Document to download (infographics only).
    #[serde(default)]
    pub url: Option<String>,
    /// Replaces the default infographic instructions.
    #[serde(default, alias = "promptTemplate")]
    pub prompt: Option<String>,
}

/// Input to a generation endpoint, from either a multipart upload or a JSON body.
pub(crate) struct StudyInput {
    pub upload: Option<Upload>,
    pub body: StudyRequest,
}

impl<S: Send + Sync> FromRequest<S> for StudyInput {
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        if is_multipart {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            let form = UploadForm::read(multipart).await.map_err(IntoResponse::into_response)?;
            let body = StudyRequest {
                content: form.field(&["content", "fileContent"]),
                filename: form.field(&["filename", "fileName"]),
                url: form.field(&["url"]),
                prompt: form.field(&["prompt", "promptTemplate"]),
            };
            return Ok(Self { upload: form.file, body });
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;
        let body = parse_json_body(&bytes).map_err(IntoResponse::into_response)?;
        Ok(Self { upload: None, body })
    }
}

// ── Documents ────────────────────────────────────────────────────

/// Sanitized upload name, or [`DEFAULT_FILENAME`] when nothing survives.
pub(crate) fn clean_filename(raw: &str) -> String {
    let name = sanitize_filename(raw);
    if name.is_empty() {
        DEFAULT_FILENAME.to_string()
    } else {
        name
    }
}

/// Response title: the document name without its extension.
pub(crate) fn title_for(source: &SourceDocument, fallback: &str) -> String {
    let stem = source.stem().trim();
    if stem.is_empty() {
        fallback.to_string()
    } else {
        stem.to_string()
    }
}

/// Extract an uploaded file's text on the blocking pool.
///
/// With `unknown_as_text`, files whose extension has no extractor are read
/// as plain text instead of being rejected.
pub(crate) async fn extract_upload(
    upload: Upload,
    unknown_as_text: bool,
) -> Result<SourceDocument, ApiError> {
    if upload.filename.trim().is_empty() {
        return Err(ApiError::bad_request("No selected file"));
    }
    let filename = clean_filename(&upload.filename);

    let doc = tokio::task::spawn_blocking(move || match extract_text(&upload.bytes, &filename) {
        Err(ExtractionError::UnsupportedType(_)) if unknown_as_text => {
            extract_as(&upload.bytes, &filename, "txt")
        }
        other => other,
    })
    .await??;

    tracing::info!(
        filename = %doc.filename,
        file_type = %doc.file_type,
        chars = doc.total_chars(),
        "Extracted upload"
    );
    Ok(doc.into_source())
}

// ── Re-exports ───────────────────────────────────────────────────

pub use converter::convert_file;
pub use flashcards::generate_flashcards;
pub use health::health;
pub use infographic::generate_infographic;
pub use payment::{check_subscription, create_checkout, customer_portal};
