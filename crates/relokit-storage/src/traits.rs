//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must
//! implement. The pipeline works against this trait only, so it never
//! couples to filesystem or object-store details.

use async_trait::async_trait;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Move failed: {0}")]
    MoveFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Destination already occupied: {0}")]
    AlreadyExists(String),

    #[error("Invalid storage path: {0}")]
    InvalidPath(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
///
/// Paths are backend-namespace relative paths such as `staging/tmp-1` or
/// `uploads/2024-01-02-photo.png`. Backends validate them; path-traversal
/// sequences and absolute paths are rejected with `InvalidPath`.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Move an artifact from `src` to `dst`.
    ///
    /// With `overwrite` set, an occupied destination is clobbered;
    /// otherwise the move fails with [`StorageError::AlreadyExists`] and
    /// the source is left untouched. The move is atomic or erroring: a
    /// failure leaves no partial destination the caller must clean up.
    async fn move_file(&self, src: &str, dst: &str, overwrite: bool) -> StorageResult<()>;

    /// Delete the artifact at `path`. Deleting a missing artifact is an
    /// error ([`StorageError::NotFound`]); callers check existence first.
    async fn delete_file(&self, path: &str) -> StorageResult<()>;

    /// Check whether an artifact exists at `path`.
    async fn exists(&self, path: &str) -> StorageResult<bool>;

    /// Get the size in bytes of an artifact, if it exists.
    async fn content_length(&self, path: &str) -> StorageResult<u64>;
}
