//! File conversion endpoint.

use axum::extract::Multipart;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use studio_ingest::convert::convert;

use super::{clean_filename, ApiError, ErrorResponse, UploadForm};

/// Convert an uploaded file
///
/// Multipart form with a `file` part and `sourceFormat` / `targetFormat`
/// fields. Responds with the converted file as an attachment.
#[utoipa::path(
    post,
    path = "/api/converter/convert-file",
    tag = "Converter",
    request_body(content_type = "multipart/form-data", description = "file, sourceFormat, targetFormat"),
    responses(
        (status = 200, description = "Converted file download", body = String, content_type = "application/octet-stream"),
        (status = 400, description = "Missing parameters or unsupported conversion", body = ErrorResponse)
    )
)]
pub async fn convert_file(multipart: Multipart) -> Result<Response, ApiError> {
    let form = UploadForm::read(multipart).await?;
    let source_format = form.field(&["sourceFormat"]);
    let target_format = form.field(&["targetFormat"]);

    let Some(upload) = form.file else {
        return Err(ApiError::bad_request("No file provided"));
    };
    let (Some(source_format), Some(target_format)) = (source_format, target_format) else {
        return Err(ApiError::bad_request("Missing parameters"));
    };

    let filename = clean_filename(&upload.filename);
    let converted = tokio::task::spawn_blocking(move || {
        convert(&upload.bytes, &filename, &source_format, &target_format)
    })
    .await??;

    Ok((
        [
            (header::CONTENT_TYPE, converted.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", converted.filename),
            ),
        ],
        converted.bytes,
    )
        .into_response())
}
