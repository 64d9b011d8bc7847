//! Domain models shared across the relokit crates.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Structured metadata describing a stored artifact, embedded in a record.
///
/// Either all four fields are empty/zero (no artifact) or `file_name` and
/// `storage_path` are both non-empty and jointly address exactly one
/// physical artifact. Writes through a [`Record`] are whole-struct
/// replacements, never per-field merges, so the record never observes a
/// partial state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMetadata {
    pub file_name: String,
    pub storage_path: String,
    pub size: u64,
    pub content_type: String,
}

impl StoredMetadata {
    /// True when no artifact is recorded.
    pub fn is_empty(&self) -> bool {
        self.file_name.is_empty() && self.storage_path.is_empty()
    }

    /// The cleared value written by reset/delete.
    pub fn cleared() -> Self {
        Self::default()
    }
}

/// Transient description of an inbound file payload before it becomes an
/// artifact. Exists only for the duration of one upload; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadDescriptor {
    /// Where the decoded payload currently sits (staging area).
    pub staging_path: String,
    /// The name the client declared for the file.
    pub declared_name: String,
    /// The declared MIME type.
    pub content_type: String,
    /// The declared size in bytes.
    pub size: u64,
}

/// The persistent entity whose metadata fields the pipeline reads and
/// writes. The record store behind this trait owns persistence, schema and
/// per-record write serialization; the pipeline only requires atomic
/// whole-struct metadata replacement and a change-detection flag.
pub trait Record: Send {
    /// Identifier used for log correlation.
    fn id(&self) -> Uuid;

    /// Current metadata view.
    fn metadata(&self) -> &StoredMetadata;

    /// Replace all four metadata fields in one atomic write.
    fn set_metadata(&mut self, metadata: StoredMetadata);

    /// Whether the store has marked the metadata fields as modified since
    /// the record was last loaded.
    fn is_modified(&self) -> bool;
}

/// Simple in-memory [`Record`] for tests and embedding callers that do not
/// bring their own record store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecord {
    id: Uuid,
    metadata: StoredMetadata,
    modified: bool,
}

impl InMemoryRecord {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            metadata: StoredMetadata::default(),
            modified: false,
        }
    }

    pub fn with_metadata(metadata: StoredMetadata) -> Self {
        Self {
            id: Uuid::new_v4(),
            metadata,
            modified: false,
        }
    }
}

impl Record for InMemoryRecord {
    fn id(&self) -> Uuid {
        self.id
    }

    fn metadata(&self) -> &StoredMetadata {
        &self.metadata
    }

    fn set_metadata(&mut self, metadata: StoredMetadata) {
        self.metadata = metadata;
        self.modified = true;
    }

    fn is_modified(&self) -> bool {
        self.modified
    }
}
