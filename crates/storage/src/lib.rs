//! Object storage boundary for photo evidence.
//!
//! The core only ever issues store-by-key and signed-URL calls; paths are
//! opaque to everything above this crate. Evidence keys are write-once
//! (no overwrite), which the S3 implementation enforces with a conditional
//! PUT.

use std::time::Duration;

use async_trait::async_trait;

pub mod memory;
pub mod s3;

pub use memory::MemoryEvidenceStore;
pub use s3::S3EvidenceStore;

/// How long a signed evidence URL stays valid.
pub const SIGNED_URL_TTL: Duration = Duration::from_secs(60);

/// Error type for evidence storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The key already holds an object; evidence keys are never reused.
    #[error("Object already exists at key '{0}'")]
    AlreadyExists(String),

    /// No object at the requested key.
    #[error("No object at key '{0}'")]
    NotFound(String),

    /// The backing store failed (network, auth, service error).
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Uploads evidence photos and mints short-lived read URLs.
#[async_trait]
pub trait EvidenceStore: Send + Sync {
    /// Store `bytes` at `key`. Fails with [`StoreError::AlreadyExists`]
    /// if the key is taken.
    async fn upload(&self, key: &str, bytes: Vec<u8>, content_type: &str)
        -> Result<(), StoreError>;

    /// Mint a time-boxed read URL for a private object.
    async fn signed_url(&self, key: &str, ttl: Duration) -> Result<String, StoreError>;
}
