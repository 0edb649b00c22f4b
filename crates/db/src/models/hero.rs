//! Hero video section.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use vitrin_core::draft::Draft;
use vitrin_core::error::CoreError;
use vitrin_core::media::{MediaRef, SlotSpec};
use vitrin_core::types::{DbId, Timestamp};
use vitrin_core::validation::FieldErrors;

use super::media_ref;

/// A `hero_videos` row joined with both of its media rows.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct HeroVideo {
    pub id: DbId,
    pub media_id: Option<DbId>,
    pub mobile_media_id: Option<DbId>,
    pub title_en: Option<String>,
    pub title_tr: Option<String>,
    pub description_en: Option<String>,
    pub description_tr: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub video_url: Option<String>,
    pub video_mime_type: Option<String>,
    pub mobile_video_url: Option<String>,
    pub mobile_video_mime_type: Option<String>,
}

/// Save payload for the hero section. The desktop video is required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct SaveHeroVideo {
    pub media_id: Option<DbId>,
    pub mobile_media_id: Option<DbId>,
    #[validate(length(max = 500))]
    pub title_en: Option<String>,
    #[validate(length(max = 500))]
    pub title_tr: Option<String>,
    #[validate(length(max = 2000))]
    pub description_en: Option<String>,
    #[validate(length(max = 2000))]
    pub description_tr: Option<String>,
    /// Media slots holding a selected file that was never uploaded.
    #[serde(default)]
    pub pending_uploads: Vec<String>,
}

impl Draft for SaveHeroVideo {
    type Record = HeroVideo;

    const SLOTS: &'static [SlotSpec] = &[
        SlotSpec::video("media_id"),
        SlotSpec::video("mobile_media_id"),
    ];

    fn from_record(record: Option<&HeroVideo>) -> Self {
        record
            .map(|r| SaveHeroVideo {
                media_id: r.media_id,
                mobile_media_id: r.mobile_media_id,
                title_en: r.title_en.clone(),
                title_tr: r.title_tr.clone(),
                description_en: r.description_en.clone(),
                description_tr: r.description_tr.clone(),
                pending_uploads: Vec::new(),
            })
            .unwrap_or_default()
    }

    fn committed_media(record: Option<&HeroVideo>) -> Vec<(&'static str, Option<MediaRef>)> {
        vec![
            (
                "media_id",
                record.and_then(|r| media_ref(r.media_id, r.video_url.as_ref())),
            ),
            (
                "mobile_media_id",
                record.and_then(|r| media_ref(r.mobile_media_id, r.mobile_video_url.as_ref())),
            ),
        ]
    }

    fn bind_media(&mut self, slot: &str, media_id: Option<DbId>) {
        match slot {
            "media_id" => self.media_id = media_id,
            "mobile_media_id" => self.mobile_media_id = media_id,
            _ => {}
        }
    }

    fn set_pending_uploads(&mut self, pending: Vec<String>) {
        self.pending_uploads = pending;
    }

    fn check(&self) -> Result<(), CoreError> {
        let mut errors = FieldErrors::new();
        if let Err(e) = self.validate() {
            errors.extend_validator(e);
        }
        errors.reject_pending_uploads(&self.pending_uploads);
        errors.require_some("media_id", self.media_id.as_ref());
        errors.into_result()
    }
}
