//! Row structs and save payloads.
//!
//! Each submodule contains:
//! - `FromRow` + `Serialize` structs matching the (joined) database rows
//! - A `Deserialize` save payload, which also implements
//!   [`vitrin_core::draft::Draft`] so it can be edited in a session

pub mod contact_info;
pub mod contact_message;
pub mod cta_section;
pub mod hero;
pub mod media;
pub mod service;
pub mod user;
pub mod why_we_exist;

use vitrin_core::media::MediaRef;
use vitrin_core::types::DbId;

/// Pair a media foreign key with its joined URL.
pub(crate) fn media_ref(media_id: Option<DbId>, url: Option<&String>) -> Option<MediaRef> {
    match (media_id, url) {
        (Some(media_id), Some(url)) => Some(MediaRef {
            media_id,
            url: url.clone(),
        }),
        _ => None,
    }
}
