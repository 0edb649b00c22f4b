//! Filesystem backend.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;

use crate::{check_path, path_from_url, public_url, ObjectMetadata, ObjectStorage, StorageError};

/// Stores objects as files under `root`, served from `public_base_url`.
/// Metadata is not persisted.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
    public_base_url: String,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into(),
        }
    }
}

#[async_trait]
impl ObjectStorage for LocalStorage {
    async fn store(
        &self,
        bytes: Bytes,
        path: &str,
        _content_type: &str,
        _metadata: &ObjectMetadata,
    ) -> Result<String, StorageError> {
        check_path(path)?;
        let target = self.root.join(path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&target, &bytes).await?;
        tracing::debug!(path, size = bytes.len(), "Stored object on local disk");
        Ok(public_url(&self.public_base_url, path))
    }

    async fn delete(&self, url: &str) -> Result<bool, StorageError> {
        let Some(path) = path_from_url(&self.public_base_url, url) else {
            return Ok(false);
        };
        match fs::remove_file(self.root.join(path)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn backend(&self) -> &'static str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn storage(dir: &tempfile::TempDir) -> LocalStorage {
        LocalStorage::new(dir.path(), "http://localhost:3000/uploads")
    }

    #[tokio::test]
    async fn store_writes_file_and_returns_public_url() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);

        let url = storage
            .store(
                Bytes::from_static(b"png bytes"),
                "images/hero/1700000000000_logo.png",
                "image/png",
                &ObjectMetadata::new(),
            )
            .await
            .unwrap();

        assert_eq!(url, "http://localhost:3000/uploads/images/hero/1700000000000_logo.png");
        let written = std::fs::read(dir.path().join("images/hero/1700000000000_logo.png")).unwrap();
        assert_eq!(written, b"png bytes");
    }

    #[tokio::test]
    async fn delete_removes_only_owned_objects() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);
        let url = storage
            .store(Bytes::from_static(b"x"), "videos/why/1_a.mp4", "video/mp4", &ObjectMetadata::new())
            .await
            .unwrap();

        assert!(storage.delete(&url).await.unwrap());
        assert!(!storage.delete(&url).await.unwrap());
        assert!(!storage.delete("https://elsewhere.example.com/videos/why/1_a.mp4").await.unwrap());
    }

    #[tokio::test]
    async fn traversal_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = storage(&dir)
            .store(Bytes::new(), "../escape.txt", "text/plain", &ObjectMetadata::new())
            .await
            .unwrap_err();
        assert_matches!(err, StorageError::InvalidPath(_));
    }
}
