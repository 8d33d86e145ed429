//! Infographic generation endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use studio_core::config::FetchConfig;
use studio_core::{InfographicDocument, SourceDocument};
use studio_ingest::fetch::{fetch_document, FetchError};
use tracing::info;

use super::{extract_upload, title_for, ApiError, ErrorResponse, StudyInput, DEFAULT_FILENAME};
use crate::state::AppState;

const FALLBACK_TITLE: &str = "Infographic";

#[derive(Serialize, utoipa::ToSchema)]
pub struct InfographicResponse {
    pub success: bool,
    #[schema(value_type = Object)]
    pub infographic: InfographicDocument,
    pub title: String,
}

/// Generate an infographic from a document, URL, or text
///
/// Input precedence is file upload, then `url`, then `content`. A non-blank
/// `prompt` replaces the default infographic instructions.
#[utoipa::path(
    post,
    path = "/api/infographic/generate-infographic",
    tag = "Study",
    request_body(content = super::StudyRequest, description = "JSON body, or multipart/form-data with a `file` part"),
    responses(
        (status = 200, description = "Generated infographic", body = InfographicResponse),
        (status = 400, description = "Missing, invalid, or unreadable input", body = ErrorResponse)
    )
)]
pub async fn generate_infographic(
    State(state): State<Arc<AppState>>,
    input: StudyInput,
) -> Result<Json<InfographicResponse>, ApiError> {
    let StudyInput { upload, body } = input;

    let source = if let Some(upload) = upload {
        extract_upload(upload, false).await?
    } else if let Some(url) = body.url.as_deref() {
        fetch_source(url, &state.config.fetch).await?
    } else if let Some(content) = body.content {
        SourceDocument::new(
            body.filename.unwrap_or_else(|| DEFAULT_FILENAME.to_string()),
            content,
        )
    } else {
        return Err(ApiError::bad_request("No input provided (file, URL, or content)"));
    };

    info!(filename = %source.name, chars = source.char_count(), "Generating infographic");
    let infographic = state
        .generator
        .infographic(&source, body.prompt.as_deref())
        .await;

    Ok(Json(InfographicResponse {
        success: true,
        infographic,
        title: title_for(&source, FALLBACK_TITLE),
    }))
}

async fn fetch_source(url: &str, fetch: &FetchConfig) -> Result<SourceDocument, ApiError> {
    match fetch_document(url, fetch.timeout_secs, fetch.max_bytes()).await {
        Ok(doc) => Ok(doc.into_source()),
        Err(FetchError::InvalidUrl) => Err(ApiError::bad_request("Invalid URL format")),
        Err(e) => Err(ApiError::BadRequest(format!("Failed to fetch URL: {e}"))),
    }
}
