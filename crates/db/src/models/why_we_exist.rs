//! "Why we exist" section: one text row plus two video slots.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use vitrin_core::draft::Draft;
use vitrin_core::error::CoreError;
use vitrin_core::media::{MediaRef, SlotSpec};
use vitrin_core::types::{DbId, Timestamp};
use vitrin_core::validation::FieldErrors;

use super::media_ref;

/// Number of video slots in the section.
pub const VIDEO_SLOTS: i16 = 2;

/// A row from the `why_sections` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct WhySection {
    pub id: DbId,
    pub main_title_en: String,
    pub main_title_tr: String,
    pub left_title_en: Option<String>,
    pub left_title_tr: Option<String>,
    pub right_paragraph_1_en: Option<String>,
    pub right_paragraph_1_tr: Option<String>,
    pub right_paragraph_2_en: Option<String>,
    pub right_paragraph_2_tr: Option<String>,
    pub bottom_text_en: Option<String>,
    pub bottom_text_tr: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A `why_videos` slot joined with its media row.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct WhyVideo {
    pub id: DbId,
    pub section_id: DbId,
    pub video_position: i16,
    pub media_id: Option<DbId>,
    pub url: Option<String>,
    pub original_filename: Option<String>,
    pub file_type: Option<String>,
}

/// The section with its video slots ordered by position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhyWeExist {
    pub section: WhySection,
    pub videos: Vec<WhyVideo>,
}

impl WhyWeExist {
    pub fn video(&self, position: i16) -> Option<&WhyVideo> {
        self.videos.iter().find(|v| v.video_position == position)
    }
}

/// Save payload. The main title is required in both languages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct SaveWhyWeExist {
    pub main_title_en: Option<String>,
    pub main_title_tr: Option<String>,
    pub left_title_en: Option<String>,
    pub left_title_tr: Option<String>,
    #[validate(length(max = 5000))]
    pub right_paragraph_1_en: Option<String>,
    #[validate(length(max = 5000))]
    pub right_paragraph_1_tr: Option<String>,
    #[validate(length(max = 5000))]
    pub right_paragraph_2_en: Option<String>,
    #[validate(length(max = 5000))]
    pub right_paragraph_2_tr: Option<String>,
    pub bottom_text_en: Option<String>,
    pub bottom_text_tr: Option<String>,
    pub video_1_media_id: Option<DbId>,
    pub video_2_media_id: Option<DbId>,
    #[serde(default)]
    pub pending_uploads: Vec<String>,
}

impl SaveWhyWeExist {
    /// Media id for slot `position` (1-based).
    pub fn video_media_id(&self, position: i16) -> Option<DbId> {
        match position {
            1 => self.video_1_media_id,
            2 => self.video_2_media_id,
            _ => None,
        }
    }
}

impl Draft for SaveWhyWeExist {
    type Record = WhyWeExist;

    const SLOTS: &'static [SlotSpec] = &[
        SlotSpec::video("video_1_media_id"),
        SlotSpec::video("video_2_media_id"),
    ];

    fn from_record(record: Option<&WhyWeExist>) -> Self {
        let Some(record) = record else {
            return SaveWhyWeExist::default();
        };
        let s = &record.section;
        SaveWhyWeExist {
            main_title_en: Some(s.main_title_en.clone()),
            main_title_tr: Some(s.main_title_tr.clone()),
            left_title_en: s.left_title_en.clone(),
            left_title_tr: s.left_title_tr.clone(),
            right_paragraph_1_en: s.right_paragraph_1_en.clone(),
            right_paragraph_1_tr: s.right_paragraph_1_tr.clone(),
            right_paragraph_2_en: s.right_paragraph_2_en.clone(),
            right_paragraph_2_tr: s.right_paragraph_2_tr.clone(),
            bottom_text_en: s.bottom_text_en.clone(),
            bottom_text_tr: s.bottom_text_tr.clone(),
            video_1_media_id: record.video(1).and_then(|v| v.media_id),
            video_2_media_id: record.video(2).and_then(|v| v.media_id),
            pending_uploads: Vec::new(),
        }
    }

    fn committed_media(record: Option<&WhyWeExist>) -> Vec<(&'static str, Option<MediaRef>)> {
        let slot = |position: i16| {
            record
                .and_then(|r| r.video(position))
                .and_then(|v| media_ref(v.media_id, v.url.as_ref()))
        };
        vec![("video_1_media_id", slot(1)), ("video_2_media_id", slot(2))]
    }

    fn bind_media(&mut self, slot: &str, media_id: Option<DbId>) {
        match slot {
            "video_1_media_id" => self.video_1_media_id = media_id,
            "video_2_media_id" => self.video_2_media_id = media_id,
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
        errors.require_pair(
            "main_title",
            self.main_title_en.as_deref(),
            self.main_title_tr.as_deref(),
        );
        errors.reject_pending_uploads(&self.pending_uploads);
        errors.into_result()
    }
}
