//! Services page: the collection settings, services, their content and tags.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use vitrin_core::content::{slugify, validate_slug};
use vitrin_core::draft::Draft;
use vitrin_core::error::CoreError;
use vitrin_core::media::{MediaRef, SlotSpec};
use vitrin_core::types::{DbId, Timestamp};
use vitrin_core::validation::FieldErrors;

use super::media_ref;

pub const DEFAULT_COLLECTION_TITLE_EN: &str = "SERVICES";
pub const DEFAULT_COLLECTION_TITLE_TR: &str = "HİZMETLER";

// ---------------------------------------------------------------------------
// Collection settings (singleton)
// ---------------------------------------------------------------------------

/// A `service_collections` row joined with its main image.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct ServiceCollection {
    pub id: DbId,
    pub main_title_en: String,
    pub main_title_tr: String,
    pub main_image_media_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub main_image_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct SaveServiceCollection {
    #[validate(length(max = 200))]
    pub main_title_en: Option<String>,
    #[validate(length(max = 200))]
    pub main_title_tr: Option<String>,
    pub main_image_media_id: Option<DbId>,
    #[serde(default)]
    pub pending_uploads: Vec<String>,
}

impl Draft for SaveServiceCollection {
    type Record = ServiceCollection;

    const SLOTS: &'static [SlotSpec] = &[SlotSpec::image("main_image_media_id")];

    fn from_record(record: Option<&ServiceCollection>) -> Self {
        record
            .map(|r| SaveServiceCollection {
                main_title_en: Some(r.main_title_en.clone()),
                main_title_tr: Some(r.main_title_tr.clone()),
                main_image_media_id: r.main_image_media_id,
                pending_uploads: Vec::new(),
            })
            .unwrap_or_default()
    }

    fn committed_media(record: Option<&ServiceCollection>) -> Vec<(&'static str, Option<MediaRef>)> {
        vec![(
            "main_image_media_id",
            record.and_then(|r| media_ref(r.main_image_media_id, r.main_image_url.as_ref())),
        )]
    }

    fn bind_media(&mut self, slot: &str, media_id: Option<DbId>) {
        if slot == "main_image_media_id" {
            self.main_image_media_id = media_id;
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

// ---------------------------------------------------------------------------
// Services
// ---------------------------------------------------------------------------

/// A `services` row joined with its `service_contents` row and image.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Service {
    pub id: DbId,
    pub collection_id: DbId,
    pub order_number: i32,
    pub title_en: String,
    pub title_tr: String,
    pub slug: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub image_media_id: Option<DbId>,
    pub image_url: Option<String>,
    pub middle_title_en: Option<String>,
    pub middle_title_tr: Option<String>,
    pub paragraph_1_en: Option<String>,
    pub paragraph_1_tr: Option<String>,
    pub paragraph_2_en: Option<String>,
    pub paragraph_2_tr: Option<String>,
}

/// A row from the `service_tags` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct ServiceTag {
    pub id: DbId,
    pub position: i32,
    pub tag_en: String,
    pub tag_tr: String,
}

/// A service with its tags in position order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceDetail {
    #[serde(flatten)]
    pub service: Service,
    pub tags: Vec<ServiceTag>,
}

/// Public services listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceList {
    pub collection: Option<ServiceCollection>,
    pub services: Vec<Service>,
}

/// One tag in a save payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TagInput {
    #[serde(default)]
    pub tag_en: String,
    #[serde(default)]
    pub tag_tr: String,
}

impl TagInput {
    pub fn is_blank(&self) -> bool {
        self.tag_en.trim().is_empty() && self.tag_tr.trim().is_empty()
    }
}

/// Create / update payload for a service. Tags replace the stored list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct SaveService {
    pub order_number: Option<i32>,
    #[validate(length(max = 200))]
    pub title_en: Option<String>,
    #[validate(length(max = 200))]
    pub title_tr: Option<String>,
    pub slug: Option<String>,
    pub is_active: Option<bool>,
    pub image_media_id: Option<DbId>,
    pub middle_title_en: Option<String>,
    pub middle_title_tr: Option<String>,
    #[validate(length(max = 5000))]
    pub paragraph_1_en: Option<String>,
    #[validate(length(max = 5000))]
    pub paragraph_1_tr: Option<String>,
    #[validate(length(max = 5000))]
    pub paragraph_2_en: Option<String>,
    #[validate(length(max = 5000))]
    pub paragraph_2_tr: Option<String>,
    #[serde(default)]
    pub tags: Vec<TagInput>,
    #[serde(default)]
    pub pending_uploads: Vec<String>,
}

impl SaveService {
    /// The slug to store: the given one, or one derived from the English title.
    pub fn resolved_slug(&self) -> String {
        match self.slug.as_deref().map(str::trim) {
            Some(slug) if !slug.is_empty() => slug.to_string(),
            _ => slugify(self.title_en.as_deref().unwrap_or_default()),
        }
    }

    /// Tags to store, fully blank ones dropped.
    pub fn kept_tags(&self) -> impl Iterator<Item = &TagInput> {
        self.tags.iter().filter(|t| !t.is_blank())
    }
}

impl Draft for SaveService {
    type Record = ServiceDetail;

    const SLOTS: &'static [SlotSpec] = &[SlotSpec::image("image_media_id")];

    fn from_record(record: Option<&ServiceDetail>) -> Self {
        let Some(detail) = record else {
            return SaveService {
                is_active: Some(true),
                ..Default::default()
            };
        };
        let s = &detail.service;
        SaveService {
            order_number: Some(s.order_number),
            title_en: Some(s.title_en.clone()),
            title_tr: Some(s.title_tr.clone()),
            slug: Some(s.slug.clone()),
            is_active: Some(s.is_active),
            image_media_id: s.image_media_id,
            middle_title_en: s.middle_title_en.clone(),
            middle_title_tr: s.middle_title_tr.clone(),
            paragraph_1_en: s.paragraph_1_en.clone(),
            paragraph_1_tr: s.paragraph_1_tr.clone(),
            paragraph_2_en: s.paragraph_2_en.clone(),
            paragraph_2_tr: s.paragraph_2_tr.clone(),
            tags: detail
                .tags
                .iter()
                .map(|t| TagInput {
                    tag_en: t.tag_en.clone(),
                    tag_tr: t.tag_tr.clone(),
                })
                .collect(),
            pending_uploads: Vec::new(),
        }
    }

    fn committed_media(record: Option<&ServiceDetail>) -> Vec<(&'static str, Option<MediaRef>)> {
        vec![(
            "image_media_id",
            record.and_then(|d| media_ref(d.service.image_media_id, d.service.image_url.as_ref())),
        )]
    }

    fn bind_media(&mut self, slot: &str, media_id: Option<DbId>) {
        if slot == "image_media_id" {
            self.image_media_id = media_id;
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
        errors.require_pair("title", self.title_en.as_deref(), self.title_tr.as_deref());
        if !errors.has("title_en") {
            if let Err(CoreError::Validation(msg)) = validate_slug(&self.resolved_slug()) {
                errors.push("slug", msg);
            }
        }
        for (i, tag) in self.tags.iter().enumerate() {
            if tag.tag_en.chars().count() > 100 || tag.tag_tr.chars().count() > 100 {
                errors.push(format!("tags[{i}]"), "must be at most 100 characters");
            }
        }
        errors.reject_pending_uploads(&self.pending_uploads);
        errors.into_result()
    }
}
