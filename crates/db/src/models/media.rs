//! Uploaded media objects.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vitrin_core::media::MediaRef;
use vitrin_core::types::{DbId, Timestamp};

/// A row from the `media` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Media {
    pub id: DbId,
    pub url: String,
    pub storage_path: String,
    pub file_type: String,
    pub mime_type: String,
    pub original_filename: String,
    pub file_size: i64,
    pub upload_context: String,
    pub uploaded_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Media {
    pub fn to_media_ref(&self) -> MediaRef {
        MediaRef {
            media_id: self.id,
            url: self.url.clone(),
        }
    }
}

/// DTO for recording a stored upload.
#[derive(Debug, Clone)]
pub struct CreateMedia {
    pub url: String,
    pub storage_path: String,
    pub file_type: String,
    pub mime_type: String,
    pub original_filename: String,
    pub file_size: i64,
    pub upload_context: String,
    pub uploaded_by: Option<DbId>,
}
