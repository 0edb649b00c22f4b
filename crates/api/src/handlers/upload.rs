//! `POST /admin/upload`: store a file in object storage and register it in
//! `media`. Content rows link to the returned `media_id` on their next save.

use std::time::Duration;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use bytes::Bytes;
use serde::Serialize;
use vitrin_core::media::{storage_path, validate_context, validate_upload};
use vitrin_core::types::DbId;
use vitrin_db::models::media::{CreateMedia, Media};
use vitrin_db::repositories::MediaRepo;
use vitrin_storage::{ObjectMetadata, StorageError};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireEditor;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UploadedMedia {
    pub media_id: DbId,
    pub url: String,
    pub file_type: String,
    pub mime_type: String,
    pub original_filename: String,
    pub file_size: i64,
}

impl From<Media> for UploadedMedia {
    fn from(m: Media) -> Self {
        Self {
            media_id: m.id,
            url: m.url,
            file_type: m.file_type,
            mime_type: m.mime_type,
            original_filename: m.original_filename,
            file_size: m.file_size,
        }
    }
}

struct FilePart {
    name: String,
    mime_type: String,
    data: Bytes,
}

/// POST /api/v1/admin/upload
///
/// Multipart fields: `file` (required) and `context` (default `general`).
/// The object is written before the `media` row; if the row insert fails the
/// object is deleted again on a best-effort basis.
pub async fn upload(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<UploadedMedia>>)> {
    let mut file: Option<FilePart> = None;
    let mut context = String::from("general");

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "file" => {
                let name = field.file_name().unwrap_or("file").to_string();
                let mime_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                file = Some(FilePart {
                    name,
                    mime_type,
                    data,
                });
            }
            "context" => {
                context = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?
                    .trim()
                    .to_string();
            }
            _ => {}
        }
    }

    let file = file.ok_or_else(|| AppError::BadRequest("No file uploaded".into()))?;
    let size = file.data.len() as u64;
    let kind = validate_upload(&file.mime_type, size)?;
    validate_context(&context)?;

    let path = storage_path(
        kind,
        &context,
        &file.name,
        chrono::Utc::now().timestamp_millis(),
    );
    let metadata = ObjectMetadata::from([
        ("uploaded-by".to_string(), user.user_id.to_string()),
        ("context".to_string(), context.clone()),
        ("original-filename".to_string(), file.name.clone()),
    ]);

    let timeout = Duration::from_secs(state.config.upload_timeout_secs);
    let url = tokio::time::timeout(
        timeout,
        state
            .storage
            .store(file.data, &path, &file.mime_type, &metadata),
    )
    .await
    .map_err(|_| StorageError::Timeout(timeout))??;

    let created = MediaRepo::create(
        &state.pool,
        &CreateMedia {
            url: url.clone(),
            storage_path: path,
            file_type: kind.as_str().to_string(),
            mime_type: file.mime_type,
            original_filename: file.name,
            file_size: size as i64,
            upload_context: context,
            uploaded_by: Some(user.user_id),
        },
    )
    .await;

    let media = match created {
        Ok(media) => media,
        Err(e) => {
            if let Err(cleanup) = state.storage.delete(&url).await {
                tracing::warn!(%url, error = %cleanup, "Failed to remove orphaned upload");
            }
            return Err(e.into());
        }
    };

    tracing::info!(
        user_id = user.user_id,
        media_id = media.id,
        file_type = %media.file_type,
        file_size = media.file_size,
        backend = state.storage.backend(),
        "Media uploaded"
    );

    Ok((StatusCode::CREATED, Json(DataResponse::new(media.into()))))
}
