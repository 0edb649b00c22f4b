//! S3-compatible backend (AWS, MinIO, R2, ...).

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;

use crate::{check_path, path_from_url, public_url, ObjectMetadata, ObjectStorage, StorageError};

/// Connection settings for [`S3Storage`].
#[derive(Debug, Clone)]
pub struct S3Settings {
    pub bucket: String,
    pub region: Option<String>,
    /// Custom endpoint for S3-compatible services; enables path-style addressing.
    pub endpoint: Option<String>,
    /// Base URL objects are served from. Derived from the bucket when absent.
    pub public_base_url: Option<String>,
}

impl S3Settings {
    fn resolved_public_base_url(&self) -> String {
        if let Some(base) = &self.public_base_url {
            return base.clone();
        }
        match &self.endpoint {
            Some(endpoint) => format!("{}/{}", endpoint.trim_end_matches('/'), self.bucket),
            None => format!(
                "https://{}.s3.{}.amazonaws.com",
                self.bucket,
                self.region.as_deref().unwrap_or("us-east-1")
            ),
        }
    }
}

pub struct S3Storage {
    client: Client,
    bucket: String,
    public_base_url: String,
}

impl S3Storage {
    /// Build a client from the ambient AWS credential chain.
    pub async fn connect(settings: S3Settings) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &settings.region {
            loader = loader.region(Region::new(region.clone()));
        }
        let shared = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint) = &settings.endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        Self {
            client: Client::from_conf(builder.build()),
            public_base_url: settings.resolved_public_base_url(),
            bucket: settings.bucket,
        }
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn store(
        &self,
        bytes: Bytes,
        path: &str,
        content_type: &str,
        metadata: &ObjectMetadata,
    ) -> Result<String, StorageError> {
        check_path(path)?;
        let size = bytes.len();
        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(path)
            .content_type(content_type)
            .body(ByteStream::from(bytes));
        for (key, value) in metadata {
            request = request.metadata(key, value);
        }
        request
            .send()
            .await
            .map_err(|e| StorageError::Backend(DisplayErrorContext(&e).to_string()))?;

        tracing::debug!(bucket = %self.bucket, key = path, size, "Stored object in S3");
        Ok(public_url(&self.public_base_url, path))
    }

    async fn delete(&self, url: &str) -> Result<bool, StorageError> {
        let Some(key) = path_from_url(&self.public_base_url, url) else {
            return Ok(false);
        };
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::Backend(DisplayErrorContext(&e).to_string()))?;
        Ok(true)
    }

    fn backend(&self) -> &'static str {
        "s3"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> S3Settings {
        S3Settings {
            bucket: "vitrin-media".into(),
            region: Some("eu-central-1".into()),
            endpoint: None,
            public_base_url: None,
        }
    }

    #[test]
    fn public_base_url_defaults_to_virtual_host() {
        assert_eq!(
            settings().resolved_public_base_url(),
            "https://vitrin-media.s3.eu-central-1.amazonaws.com"
        );
    }

    #[test]
    fn custom_endpoint_uses_path_style_url() {
        let s = S3Settings {
            endpoint: Some("http://localhost:9000/".into()),
            ..settings()
        };
        assert_eq!(s.resolved_public_base_url(), "http://localhost:9000/vitrin-media");
    }

    #[test]
    fn explicit_public_base_wins() {
        let s = S3Settings {
            public_base_url: Some("https://cdn.example.com".into()),
            ..settings()
        };
        assert_eq!(s.resolved_public_base_url(), "https://cdn.example.com");
    }
}
