//! Company contact details shown in the footer and contact page.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use vitrin_core::draft::Draft;
use vitrin_core::error::CoreError;
use vitrin_core::media::{MediaRef, SlotSpec};
use vitrin_core::types::{DbId, Timestamp};
use vitrin_core::validation::FieldErrors;

/// A row from the `contact_info` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct ContactInfo {
    pub id: DbId,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address_en: Option<String>,
    pub address_tr: Option<String>,
    pub linkedin_url: Option<String>,
    pub instagram_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Save payload. Every field is optional; a save overwrites all of them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct SaveContactInfo {
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    #[validate(length(max = 1000))]
    pub address_en: Option<String>,
    #[validate(length(max = 1000))]
    pub address_tr: Option<String>,
    #[validate(url)]
    pub linkedin_url: Option<String>,
    #[validate(url)]
    pub instagram_url: Option<String>,
    #[serde(default)]
    pub pending_uploads: Vec<String>,
}

impl SaveContactInfo {
    /// Blank strings are stored as NULL.
    pub fn normalized(&self) -> SaveContactInfo {
        let clean = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        SaveContactInfo {
            email: clean(&self.email),
            phone: clean(&self.phone),
            address_en: clean(&self.address_en),
            address_tr: clean(&self.address_tr),
            linkedin_url: clean(&self.linkedin_url),
            instagram_url: clean(&self.instagram_url),
            pending_uploads: self.pending_uploads.clone(),
        }
    }
}

impl Draft for SaveContactInfo {
    type Record = ContactInfo;

    const SLOTS: &'static [SlotSpec] = &[];

    fn from_record(record: Option<&ContactInfo>) -> Self {
        record
            .map(|r| SaveContactInfo {
                email: r.email.clone(),
                phone: r.phone.clone(),
                address_en: r.address_en.clone(),
                address_tr: r.address_tr.clone(),
                linkedin_url: r.linkedin_url.clone(),
                instagram_url: r.instagram_url.clone(),
                pending_uploads: Vec::new(),
            })
            .unwrap_or_default()
    }

    fn committed_media(_record: Option<&ContactInfo>) -> Vec<(&'static str, Option<MediaRef>)> {
        Vec::new()
    }

    fn bind_media(&mut self, _slot: &str, _media_id: Option<DbId>) {}

    fn set_pending_uploads(&mut self, pending: Vec<String>) {
        self.pending_uploads = pending;
    }

    fn check(&self) -> Result<(), CoreError> {
        let mut errors = FieldErrors::new();
        if let Err(e) = self.normalized().validate() {
            errors.extend_validator(e);
        }
        errors.reject_pending_uploads(&self.pending_uploads);
        errors.into_result()
    }
}
