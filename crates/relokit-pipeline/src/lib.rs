//! Relokit Pipeline Library
//!
//! The upload-relocation pipeline: a [`FieldDefinition`] describes where and
//! how artifacts are stored, [`MoveOperation`] relocates a staged payload
//! through the ordered hook chains, [`ArtifactState`] derives existence and
//! public location from a record's stored metadata, and [`RequestAction`]
//! translates an inbound form submission into delete/reset/upload calls.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use relokit_core::{InMemoryRecord, UploadDescriptor};
//! use relokit_pipeline::{FieldDefinition, UploadField};
//! use relokit_storage::MemoryStorage;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let definition = FieldDefinition::builder()
//!     .destination("uploads")
//!     .allowed_types(["image/png"])
//!     .build()?;
//! let field = UploadField::new(definition, Arc::new(MemoryStorage::new()));
//!
//! let mut record = InMemoryRecord::new();
//! let descriptor = UploadDescriptor {
//!     staging_path: "staging/tmp-1".into(),
//!     declared_name: "photo.png".into(),
//!     content_type: "image/png".into(),
//!     size: 1024,
//! };
//! let metadata = field.mover().upload(&mut record, &descriptor, true).await?;
//! assert_eq!(field.artifact().public_location(&record), "uploads/photo.png");
//! # let _ = metadata;
//! # Ok(())
//! # }
//! ```

pub mod artifact;
pub mod field;
pub mod move_op;
pub mod request;
pub mod schema_field;

pub use artifact::ArtifactState;
pub use field::{FieldDefinition, FieldDefinitionBuilder, Formatter, NamingPolicy};
pub use move_op::MoveOperation;
pub use request::{RecordAction, RequestAction, RequestOutcome, UploadRequest, DEFAULT_UPLOAD_SLOT};
pub use schema_field::{SchemaField, UploadField};
