//! Multipart upload for `file` answers and file cells of repeatable rows.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use folio_core::upload::check_upload;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Public URL to store as the answer.
    pub url: String,
}

/// POST /api/v1/uploads
///
/// Accepts a single `file` part (image or PDF) and returns its public URL.
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        check_upload(&content_type, bytes.len(), state.config.upload.max_bytes)?;
        let url = state
            .uploader
            .upload(&file_name, &content_type, bytes.to_vec())
            .await?;

        return Ok((
            StatusCode::CREATED,
            Json(DataResponse {
                data: UploadResponse { url },
            }),
        ));
    }

    Err(AppError::BadRequest(format!(
        "Missing multipart field '{FILE_FIELD}'"
    )))
}
