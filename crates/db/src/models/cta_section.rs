//! Call-to-action section with its marquee strip.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use vitrin_core::draft::Draft;
use vitrin_core::error::CoreError;
use vitrin_core::list_shape::{self, BilingualItem};
use vitrin_core::media::{MediaRef, SlotSpec};
use vitrin_core::types::{DbId, Timestamp};
use vitrin_core::validation::FieldErrors;

use super::media_ref;

pub const DEFAULT_BUTTON_LINK: &str = "#contact";

/// A raw `cta_section` row; `marquee_items` may be in any stored shape.
#[derive(Debug, Clone, FromRow)]
pub struct CtaSectionRow {
    pub id: DbId,
    pub main_title_en: String,
    pub main_title_tr: String,
    pub description_en: String,
    pub description_tr: String,
    pub button_text_en: Option<String>,
    pub button_text_tr: Option<String>,
    pub button_link: String,
    pub background_image_media_id: Option<DbId>,
    pub marquee_items: serde_json::Value,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub background_image_url: Option<String>,
}

/// The CTA section with marquee items in canonical form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CtaSection {
    pub id: DbId,
    pub main_title_en: String,
    pub main_title_tr: String,
    pub description_en: String,
    pub description_tr: String,
    pub button_text_en: Option<String>,
    pub button_text_tr: Option<String>,
    pub button_link: String,
    pub background_image_media_id: Option<DbId>,
    pub background_image_url: Option<String>,
    pub marquee_items: Vec<BilingualItem>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<CtaSectionRow> for CtaSection {
    type Error = CoreError;

    fn try_from(row: CtaSectionRow) -> Result<Self, Self::Error> {
        Ok(CtaSection {
            marquee_items: list_shape::normalize(row.marquee_items)?,
            id: row.id,
            main_title_en: row.main_title_en,
            main_title_tr: row.main_title_tr,
            description_en: row.description_en,
            description_tr: row.description_tr,
            button_text_en: row.button_text_en,
            button_text_tr: row.button_text_tr,
            button_link: row.button_link,
            background_image_media_id: row.background_image_media_id,
            background_image_url: row.background_image_url,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Save payload. Title and description are required in both languages.
///
/// `marquee_items` accepts every stored list shape and is normalised on
/// deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct SaveCtaSection {
    pub main_title_en: Option<String>,
    pub main_title_tr: Option<String>,
    pub description_en: Option<String>,
    pub description_tr: Option<String>,
    #[validate(length(max = 100))]
    pub button_text_en: Option<String>,
    #[validate(length(max = 100))]
    pub button_text_tr: Option<String>,
    #[validate(length(max = 500))]
    pub button_link: Option<String>,
    pub background_image_media_id: Option<DbId>,
    #[serde(default, deserialize_with = "list_shape::deserialize_items")]
    pub marquee_items: Vec<BilingualItem>,
    #[serde(default)]
    pub pending_uploads: Vec<String>,
}

impl SaveCtaSection {
    /// Button link to store; blank means the contact anchor.
    pub fn button_link_or_default(&self) -> &str {
        match self.button_link.as_deref().map(str::trim) {
            Some(link) if !link.is_empty() => link,
            _ => DEFAULT_BUTTON_LINK,
        }
    }
}

impl Draft for SaveCtaSection {
    type Record = CtaSection;

    const SLOTS: &'static [SlotSpec] = &[SlotSpec::image("background_image_media_id")];

    fn from_record(record: Option<&CtaSection>) -> Self {
        record
            .map(|r| SaveCtaSection {
                main_title_en: Some(r.main_title_en.clone()),
                main_title_tr: Some(r.main_title_tr.clone()),
                description_en: Some(r.description_en.clone()),
                description_tr: Some(r.description_tr.clone()),
                button_text_en: r.button_text_en.clone(),
                button_text_tr: r.button_text_tr.clone(),
                button_link: Some(r.button_link.clone()),
                background_image_media_id: r.background_image_media_id,
                marquee_items: r.marquee_items.clone(),
                pending_uploads: Vec::new(),
            })
            .unwrap_or_default()
    }

    fn committed_media(record: Option<&CtaSection>) -> Vec<(&'static str, Option<MediaRef>)> {
        vec![(
            "background_image_media_id",
            record.and_then(|r| {
                media_ref(r.background_image_media_id, r.background_image_url.as_ref())
            }),
        )]
    }

    fn bind_media(&mut self, slot: &str, media_id: Option<DbId>) {
        if slot == "background_image_media_id" {
            self.background_image_media_id = media_id;
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
        errors.require_pair(
            "description",
            self.description_en.as_deref(),
            self.description_tr.as_deref(),
        );
        for (i, item) in self.marquee_items.iter().enumerate() {
            if item.is_blank() {
                errors.push(format!("marquee_items[{i}]"), "needs text in at least one language");
            }
        }
        errors.reject_pending_uploads(&self.pending_uploads);
        errors.into_result()
    }
}
