//! In-memory evidence store for tests and local development.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::{EvidenceStore, StoreError};

#[derive(Debug, Clone)]
struct StoredObject {
    content_type: String,
    bytes: Vec<u8>,
}

/// Keeps objects in a process-local map. Signed URLs are fake but stable,
/// so handlers and tests can assert on them.
#[derive(Default)]
pub struct MemoryEvidenceStore {
    objects: Mutex<HashMap<String, StoredObject>>,
    /// When set, the next `upload` call fails with a backend error. Lets
    /// tests exercise the "partial batch never links" path.
    fail_next_upload: Mutex<bool>,
}

impl MemoryEvidenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next_upload(&self) {
        *self.fail_next_upload.lock().unwrap() = true;
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects.lock().unwrap().contains_key(key)
    }

    pub fn content_type_of(&self, key: &str) -> Option<String> {
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .map(|o| o.content_type.clone())
    }

    pub fn bytes_of(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.lock().unwrap().get(key).map(|o| o.bytes.clone())
    }
}

#[async_trait]
impl EvidenceStore for MemoryEvidenceStore {
    async fn upload(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StoreError> {
        if std::mem::take(&mut *self.fail_next_upload.lock().unwrap()) {
            return Err(StoreError::Backend("injected upload failure".into()));
        }

        let mut objects = self.objects.lock().unwrap();
        if objects.contains_key(key) {
            return Err(StoreError::AlreadyExists(key.to_string()));
        }
        objects.insert(
            key.to_string(),
            StoredObject {
                content_type: content_type.to_string(),
                bytes,
            },
        );
        Ok(())
    }

    async fn signed_url(&self, key: &str, ttl: Duration) -> Result<String, StoreError> {
        let objects = self.objects.lock().unwrap();
        if !objects.contains_key(key) {
            return Err(StoreError::NotFound(key.to_string()));
        }
        Ok(format!(
            "memory://evidence/{key}?expires_in={}",
            ttl.as_secs()
        ))
    }
}
