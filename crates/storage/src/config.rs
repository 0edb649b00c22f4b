//! Backend selection from the environment.

use std::path::PathBuf;
use std::sync::Arc;

use crate::local::LocalStorage;
use crate::s3::{S3Settings, S3Storage};
use crate::{ObjectStorage, StorageError};

const DEFAULT_LOCAL_ROOT: &str = "./uploads";
const DEFAULT_LOCAL_BASE_URL: &str = "http://localhost:3000/uploads";

#[derive(Debug, Clone)]
pub enum StorageConfig {
    Local {
        root: PathBuf,
        public_base_url: String,
    },
    S3(S3Settings),
}

impl StorageConfig {
    /// Load storage settings from environment variables.
    ///
    /// | Env Var                   | Default                          |
    /// |---------------------------|----------------------------------|
    /// | `STORAGE_BACKEND`         | `local` (`local` or `s3`)        |
    /// | `STORAGE_LOCAL_ROOT`      | `./uploads`                      |
    /// | `STORAGE_PUBLIC_BASE_URL` | `http://localhost:3000/uploads` for local, derived for S3 |
    /// | `S3_BUCKET`               | required for `s3`                |
    /// | `S3_REGION`               | AWS default chain                |
    /// | `S3_ENDPOINT`             | none (AWS)                       |
    pub fn from_env() -> Result<Self, StorageError> {
        let backend = std::env::var("STORAGE_BACKEND").unwrap_or_else(|_| "local".into());
        let public_base_url = std::env::var("STORAGE_PUBLIC_BASE_URL").ok();

        match backend.to_lowercase().as_str() {
            "local" => Ok(StorageConfig::Local {
                root: std::env::var("STORAGE_LOCAL_ROOT")
                    .unwrap_or_else(|_| DEFAULT_LOCAL_ROOT.into())
                    .into(),
                public_base_url: public_base_url.unwrap_or_else(|| DEFAULT_LOCAL_BASE_URL.into()),
            }),
            "s3" => {
                let bucket = std::env::var("S3_BUCKET")
                    .map_err(|_| StorageError::Config("S3_BUCKET must be set for the s3 backend".into()))?;
                Ok(StorageConfig::S3(S3Settings {
                    bucket,
                    region: std::env::var("S3_REGION").ok(),
                    endpoint: std::env::var("S3_ENDPOINT").ok(),
                    public_base_url,
                }))
            }
            other => Err(StorageError::Config(format!(
                "Invalid STORAGE_BACKEND '{other}'. Must be one of: local, s3"
            ))),
        }
    }

    /// Construct the configured backend.
    pub async fn build(self) -> Arc<dyn ObjectStorage> {
        match self {
            StorageConfig::Local {
                root,
                public_base_url,
            } => Arc::new(LocalStorage::new(root, public_base_url)),
            StorageConfig::S3(settings) => Arc::new(S3Storage::connect(settings).await),
        }
    }
}
