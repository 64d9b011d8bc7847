//! Relokit Core Library
//!
//! This crate provides the domain models, error types, and hook interfaces
//! shared by the relokit storage and pipeline crates. It performs no I/O:
//! the physical storage collaborator lives in `relokit-storage` and the
//! upload pipeline itself in `relokit-pipeline`.

pub mod error;
pub mod hooks;
pub mod models;

// Re-export commonly used types
pub use error::UploadError;
pub use hooks::{HookContext, HookPhase, UploadHook};
pub use models::{InMemoryRecord, Record, StoredMetadata, UploadDescriptor};
