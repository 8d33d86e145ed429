//! Flashcard generation endpoint.
//!
//! SRP: resolve the source document and hand it to the generator.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use studio_core::{Flashcard, SourceDocument};
use tracing::info;

use super::{extract_upload, title_for, ApiError, ErrorResponse, StudyInput, DEFAULT_FILENAME};
use crate::state::AppState;

const FALLBACK_TITLE: &str = "Study Notes";

#[derive(Serialize, utoipa::ToSchema)]
pub struct FlashcardsResponse {
    pub success: bool,
    #[schema(value_type = Vec<Object>)]
    pub flashcards: Vec<Flashcard>,
    pub title: String,
}

/// Generate flashcards from a document
///
/// Accepts either multipart/form-data with a `file` part, or a JSON body
/// `{content, filename}`. Generation problems never fail the request; the
/// response then carries flashcards built heuristically from the text.
#[utoipa::path(
    post,
    path = "/api/flashcards/generate-flashcards",
    tag = "Study",
    request_body(content = super::StudyRequest, description = "JSON body, or multipart/form-data with a `file` part"),
    responses(
        (status = 200, description = "Generated flashcards", body = FlashcardsResponse),
        (status = 400, description = "Missing or unreadable input", body = ErrorResponse)
    )
)]
pub async fn generate_flashcards(
    State(state): State<Arc<AppState>>,
    input: StudyInput,
) -> Result<Json<FlashcardsResponse>, ApiError> {
    let source = match (input.upload, input.body.content) {
        (Some(upload), _) => extract_upload(upload, true).await?,
        (None, Some(content)) => SourceDocument::new(
            input.body.filename.unwrap_or_else(|| DEFAULT_FILENAME.to_string()),
            content,
        ),
        (None, None) => return Err(ApiError::bad_request("No file or content provided")),
    };

    info!(filename = %source.name, chars = source.char_count(), "Generating flashcards");
    let flashcards = state.generator.flashcards(&source).await;

    Ok(Json(FlashcardsResponse {
        success: true,
        flashcards,
        title: title_for(&source, FALLBACK_TITLE),
    }))
}
