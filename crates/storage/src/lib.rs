//! Object storage for uploaded media.
//!
//! [`ObjectStorage`] is the seam the upload endpoint writes through. Two
//! backends exist: [`local::LocalStorage`] (files under a directory, served
//! from a public base URL) and [`s3::S3Storage`] (any S3-compatible bucket).
//! Stored objects are durable; nothing in the content layer deletes them.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

pub mod config;
pub mod local;
pub mod s3;

pub use config::StorageConfig;

/// Metadata attached to a stored object (`uploaded-by`, `context`, ...).
pub type ObjectMetadata = BTreeMap<String, String>;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Invalid storage path: {0}")]
    InvalidPath(String),

    #[error("Storage configuration error: {0}")]
    Config(String),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Storage operation timed out after {0:?}")]
    Timeout(Duration),
}

/// A place to put uploaded bytes.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Write `bytes` at `path` and return the public URL of the object.
    async fn store(
        &self,
        bytes: Bytes,
        path: &str,
        content_type: &str,
        metadata: &ObjectMetadata,
    ) -> Result<String, StorageError>;

    /// Delete the object behind `url`. `Ok(false)` when there was nothing to
    /// delete or the URL does not belong to this storage.
    async fn delete(&self, url: &str) -> Result<bool, StorageError>;

    /// Short backend name for logs.
    fn backend(&self) -> &'static str;
}

/// Reject paths that could escape the storage root.
pub fn check_path(path: &str) -> Result<(), StorageError> {
    let invalid = path.is_empty()
        || path.starts_with('/')
        || path.contains('\\')
        || path.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..");
    if invalid {
        return Err(StorageError::InvalidPath(path.to_string()));
    }
    Ok(())
}

/// Join a public base URL and an object path with exactly one slash.
pub(crate) fn public_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path)
}

/// The object path behind `url`, if it was issued under `base`.
pub(crate) fn path_from_url<'a>(base: &str, url: &'a str) -> Option<&'a str> {
    url.strip_prefix(base.trim_end_matches('/'))
        .and_then(|rest| rest.strip_prefix('/'))
        .filter(|path| check_path(path).is_ok())
}
