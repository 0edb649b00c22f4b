//! Domain logic for the bilingual site content service.
//!
//! Everything here is free of HTTP and database plumbing so it can be unit
//! tested directly and shared by the server (`vitrin-api`) and the admin
//! client (`vitrin-client`).

pub mod account;
pub mod bilingual;
pub mod contact;
pub mod content;
pub mod draft;
pub mod editor;
pub mod error;
pub mod i18n;
pub mod list_shape;
pub mod locale;
pub mod media;
pub mod roles;
pub mod types;
pub mod validation;
