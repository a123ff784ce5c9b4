//! S3-backed evidence store.

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;

use crate::{EvidenceStore, StoreError};

/// Evidence store over an S3 (or S3-compatible) bucket.
///
/// The bucket is expected to be private; reads go through presigned URLs
/// only.
#[derive(Clone)]
pub struct S3EvidenceStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3EvidenceStore {
    /// Build a store from the ambient AWS configuration (env credentials,
    /// region, optional custom endpoint for MinIO-style deployments).
    pub async fn from_env(bucket: impl Into<String>) -> Self {
        let config = aws_config::load_from_env().await;
        Self {
            client: aws_sdk_s3::Client::new(&config),
            bucket: bucket.into(),
        }
    }

    pub fn new(client: aws_sdk_s3::Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl EvidenceStore for S3EvidenceStore {
    async fn upload(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StoreError> {
        // `If-None-Match: *` makes the PUT conditional on the key being
        // free, giving evidence its no-overwrite semantics server-side.
        let result = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .if_none_match("*")
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(err) => {
                let service_err = err.raw_response();
                if service_err.map(|r| r.status().as_u16()) == Some(412) {
                    return Err(StoreError::AlreadyExists(key.to_string()));
                }
                tracing::error!(key, error = %err, "Evidence upload failed");
                Err(StoreError::Backend(err.to_string()))
            }
        }
    }

    async fn signed_url(&self, key: &str, ttl: Duration) -> Result<String, StoreError> {
        let presigning = PresigningConfig::expires_in(ttl)
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| {
                tracing::error!(key, error = %e, "Presigning evidence URL failed");
                StoreError::Backend(e.to_string())
            })?;

        Ok(request.uri().to_string())
    }
}
