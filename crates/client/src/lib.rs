//! HTTP client for the admin API.
//!
//! [`AdminClient`] wraps the `/api/v1` endpoints an editor uses.
//! [`SectionGateway`] adapts it to the editor's [`ContentGateway`] and
//! [`MediaUploader`] traits, so an [`Editor`](vitrin_core::editor::Editor)
//! can drive a real server.
//!
//! [`ContentGateway`]: vitrin_core::editor::ContentGateway
//! [`MediaUploader`]: vitrin_core::editor::MediaUploader

pub mod client;
pub mod error;
pub mod gateway;

pub use client::AdminClient;
pub use error::ClientError;
pub use gateway::{AdminSection, SectionGateway};
