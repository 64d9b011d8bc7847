use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::traits::{Storage, StorageError, StorageResult};

/// Local filesystem storage implementation
///
/// All storage paths are resolved relative to `base_path`; the staging area
/// and the durable destinations live in the same namespace.
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage instance rooted at `base_path`. The root
    /// directory is created if it does not exist.
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage { base_path })
    }

    /// Convert a storage path to a filesystem path with traversal validation.
    fn resolve(&self, storage_path: &str) -> StorageResult<PathBuf> {
        if storage_path.is_empty()
            || storage_path.starts_with('/')
            || storage_path
                .split('/')
                .any(|segment| segment == ".." || segment == ".")
        {
            return Err(StorageError::InvalidPath(storage_path.to_string()));
        }

        Ok(self.base_path.join(storage_path))
    }

    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::MoveFailed(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Fallback for moves that cross a filesystem boundary, where rename
    /// is not available: copy then remove the source.
    async fn copy_then_remove(&self, src: &Path, dst: &Path) -> StorageResult<()> {
        fs::copy(src, dst).await.map_err(|e| {
            StorageError::MoveFailed(format!(
                "Failed to copy {} to {}: {}",
                src.display(),
                dst.display(),
                e
            ))
        })?;

        fs::remove_file(src).await.map_err(|e| {
            StorageError::MoveFailed(format!(
                "Failed to remove source {} after copy: {}",
                src.display(),
                e
            ))
        })?;

        Ok(())
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn move_file(&self, src: &str, dst: &str, overwrite: bool) -> StorageResult<()> {
        let src_path = self.resolve(src)?;
        let dst_path = self.resolve(dst)?;

        if !fs::try_exists(&src_path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(src.to_string()));
        }

        if !overwrite && fs::try_exists(&dst_path).await.unwrap_or(false) {
            return Err(StorageError::AlreadyExists(dst.to_string()));
        }

        self.ensure_parent_dir(&dst_path).await?;

        match fs::rename(&src_path, &dst_path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::CrossesDevices => {
                self.copy_then_remove(&src_path, &dst_path).await?;
            }
            Err(e) => {
                return Err(StorageError::MoveFailed(format!(
                    "Failed to move {} to {}: {}",
                    src_path.display(),
                    dst_path.display(),
                    e
                )));
            }
        }

        tracing::info!(
            src = %src,
            dst = %dst,
            overwrite = overwrite,
            "Local storage move successful"
        );

        Ok(())
    }

    async fn delete_file(&self, path: &str) -> StorageResult<()> {
        let fs_path = self.resolve(path)?;

        if !fs::try_exists(&fs_path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(path.to_string()));
        }

        fs::remove_file(&fs_path).await.map_err(|e| {
            StorageError::DeleteFailed(format!("Failed to delete {}: {}", fs_path.display(), e))
        })?;

        tracing::info!(path = %path, "Local storage delete successful");

        Ok(())
    }

    async fn exists(&self, path: &str) -> StorageResult<bool> {
        let fs_path = self.resolve(path)?;
        Ok(fs::try_exists(&fs_path).await.unwrap_or(false))
    }

    async fn content_length(&self, path: &str) -> StorageResult<u64> {
        let fs_path = self.resolve(path)?;
        let meta = fs::metadata(&fs_path)
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => StorageError::NotFound(path.to_string()),
                _ => StorageError::IoError(e),
            })?;
        Ok(meta.len())
    }
}
