//! Repository for the `media` table.

use sqlx::PgPool;
use vitrin_core::types::DbId;

use crate::models::media::{CreateMedia, Media};

/// Column list for `media` queries.
const COLUMNS: &str = "\
    id, url, storage_path, file_type, mime_type, original_filename, \
    file_size, upload_context, uploaded_by, created_at, updated_at";

/// Provides data access for uploaded media.
pub struct MediaRepo;

impl MediaRepo {
    /// Record an object that has been written to storage.
    pub async fn create(pool: &PgPool, dto: &CreateMedia) -> Result<Media, sqlx::Error> {
        let query = format!(
            "INSERT INTO media \
                 (url, storage_path, file_type, mime_type, original_filename, \
                  file_size, upload_context, uploaded_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Media>(&query)
            .bind(&dto.url)
            .bind(&dto.storage_path)
            .bind(&dto.file_type)
            .bind(&dto.mime_type)
            .bind(&dto.original_filename)
            .bind(dto.file_size)
            .bind(&dto.upload_context)
            .bind(dto.uploaded_by)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Media>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM media WHERE id = $1");
        sqlx::query_as::<_, Media>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
