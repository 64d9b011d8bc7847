//! In-memory storage backend.
//!
//! Map-backed [`Storage`] implementation used by tests and by embedding
//! callers that want the pipeline semantics without a filesystem.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::traits::{Storage, StorageError, StorageResult};

#[derive(Clone, Default)]
pub struct MemoryStorage {
    objects: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object directly, bypassing the move path. Used to stage
    /// inbound payloads.
    pub async fn put(&self, path: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.objects.lock().await.insert(path.into(), data.into());
    }

    /// Read an object back, if present.
    pub async fn get(&self, path: &str) -> Option<Vec<u8>> {
        self.objects.lock().await.get(path).cloned()
    }

    fn validate(path: &str) -> StorageResult<()> {
        if path.is_empty() || path.starts_with('/') || path.contains("..") {
            return Err(StorageError::InvalidPath(path.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn move_file(&self, src: &str, dst: &str, overwrite: bool) -> StorageResult<()> {
        Self::validate(src)?;
        Self::validate(dst)?;

        let mut objects = self.objects.lock().await;

        if !objects.contains_key(src) {
            return Err(StorageError::NotFound(src.to_string()));
        }
        if !overwrite && objects.contains_key(dst) {
            return Err(StorageError::AlreadyExists(dst.to_string()));
        }

        let data = objects.remove(src).unwrap_or_default();
        objects.insert(dst.to_string(), data);

        tracing::debug!(src = %src, dst = %dst, "Memory storage move");

        Ok(())
    }

    async fn delete_file(&self, path: &str) -> StorageResult<()> {
        Self::validate(path)?;

        let mut objects = self.objects.lock().await;
        if objects.remove(path).is_none() {
            return Err(StorageError::NotFound(path.to_string()));
        }
        Ok(())
    }

    async fn exists(&self, path: &str) -> StorageResult<bool> {
        Self::validate(path)?;
        Ok(self.objects.lock().await.contains_key(path))
    }

    async fn content_length(&self, path: &str) -> StorageResult<u64> {
        Self::validate(path)?;
        self.objects
            .lock()
            .await
            .get(path)
            .map(|data| data.len() as u64)
            .ok_or_else(|| StorageError::NotFound(path.to_string()))
    }
}
