//! Capability surface consumed by an external record-schema collaborator.
//!
//! The schema layer composes an [`UploadField`] rather than inheriting
//! from it: the field exposes `validate_input` / `apply_update` / `render`
//! and hands out the pipeline components operating on its configuration.

use std::sync::Arc;

use relokit_core::{Record, UploadError};
use relokit_storage::Storage;

use crate::artifact::ArtifactState;
use crate::field::FieldDefinition;
use crate::move_op::MoveOperation;
use crate::request::RequestAction;

/// The small interface a record schema needs from any field kind.
pub trait SchemaField {
    /// Whether a direct (non-upload) value is acceptable input.
    fn validate_input(&self, value: &serde_json::Value) -> bool;

    /// Apply a direct (non-upload) value to the record.
    fn apply_update(&self, record: &mut dyn Record, value: &serde_json::Value)
        -> Result<(), UploadError>;

    /// Display form of the field's current value.
    fn render(&self, record: &dyn Record) -> String;
}

/// User-facing bundle tying a [`FieldDefinition`] to a storage backend and
/// handing out the pipeline components that operate on it.
pub struct UploadField {
    field: Arc<FieldDefinition>,
    storage: Arc<dyn Storage>,
}

impl UploadField {
    pub fn new(field: FieldDefinition, storage: Arc<dyn Storage>) -> Self {
        Self {
            field: Arc::new(field),
            storage,
        }
    }

    pub fn definition(&self) -> &FieldDefinition {
        &self.field
    }

    /// Derived artifact view (existence, public location, reset, delete).
    pub fn artifact(&self) -> ArtifactState<'_> {
        ArtifactState::new(&self.field, self.storage.as_ref())
    }

    /// The move pipeline for this field.
    pub fn mover(&self) -> MoveOperation {
        MoveOperation::new(self.field.clone(), self.storage.clone())
    }

    /// Request dispatcher reading the default upload slot.
    pub fn request_action(&self) -> RequestAction {
        RequestAction::new(self.field.clone(), self.storage.clone())
    }

    /// Request dispatcher reading a custom upload slot.
    pub fn request_action_with_slot(&self, slot: impl Into<String>) -> RequestAction {
        RequestAction::with_slot(self.field.clone(), self.storage.clone(), slot)
    }
}

impl SchemaField for UploadField {
    fn validate_input(&self, _value: &serde_json::Value) -> bool {
        // Uploads are the only write path for this field kind; direct input
        // carries nothing to validate.
        true
    }

    fn apply_update(
        &self,
        _record: &mut dyn Record,
        _value: &serde_json::Value,
    ) -> Result<(), UploadError> {
        // Direct updates bypass the pipeline and are deliberately a no-op;
        // metadata changes only through upload, reset and delete.
        Ok(())
    }

    fn render(&self, record: &dyn Record) -> String {
        self.artifact().render(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relokit_core::{InMemoryRecord, StoredMetadata};
    use relokit_storage::MemoryStorage;
    use serde_json::json;

    fn upload_field() -> UploadField {
        let definition = FieldDefinition::builder().destination("uploads").build().unwrap();
        UploadField::new(definition, Arc::new(MemoryStorage::new()))
    }

    #[test]
    fn test_validate_input_accepts_everything() {
        let field = upload_field();
        assert!(field.validate_input(&json!({"file_name": "a.png"})));
        assert!(field.validate_input(&json!(null)));
    }

    #[test]
    fn test_apply_update_is_a_noop() {
        let field = upload_field();
        let mut record = InMemoryRecord::new();

        field
            .apply_update(&mut record, &json!({"file_name": "sneaky.png"}))
            .unwrap();
        assert!(record.metadata().is_empty());
    }

    #[test]
    fn test_render_delegates_to_artifact_view() {
        let field = upload_field();
        let record = InMemoryRecord::with_metadata(StoredMetadata {
            file_name: "photo.png".to_string(),
            storage_path: "uploads".to_string(),
            size: 4,
            content_type: "image/png".to_string(),
        });

        assert_eq!(field.render(&record), "uploads/photo.png");
        assert_eq!(field.render(&InMemoryRecord::new()), "");
    }
}
