//! Derived artifact state over a record's stored metadata.
//!
//! [`ArtifactState`] is stateless: every read recomputes from the record's
//! current metadata and the field configuration, so there is no cached
//! state to invalidate.

use relokit_core::{Record, StoredMetadata, UploadError};
use relokit_storage::{paths, Storage, StorageResult};

use crate::field::FieldDefinition;

pub struct ArtifactState<'a> {
    field: &'a FieldDefinition,
    storage: &'a dyn Storage,
}

impl<'a> ArtifactState<'a> {
    pub fn new(field: &'a FieldDefinition, storage: &'a dyn Storage) -> Self {
        Self { field, storage }
    }

    /// True iff the record addresses an artifact AND the storage
    /// collaborator confirms it is present at that address.
    pub async fn exists(&self, record: &dyn Record) -> StorageResult<bool> {
        let metadata = record.metadata();
        if metadata.is_empty() {
            return Ok(false);
        }
        self.storage
            .exists(&paths::join(&metadata.storage_path, &metadata.file_name))
            .await
    }

    /// Public address of the artifact: the configured public prefix when
    /// set, else the storage path, joined with the file name. Pure function
    /// of metadata and configuration; empty string when there is no
    /// artifact.
    pub fn public_location(&self, record: &dyn Record) -> String {
        let metadata = record.metadata();
        if metadata.is_empty() {
            return String::new();
        }
        let prefix = self
            .field
            .public_prefix()
            .unwrap_or(&metadata.storage_path);
        paths::join(prefix, &metadata.file_name)
    }

    /// Display form of the field value: the configured formatter applied to
    /// (record, metadata, href) when one is set, else the public location.
    pub fn render(&self, record: &dyn Record) -> String {
        let metadata = record.metadata();
        if metadata.is_empty() {
            return String::new();
        }
        let href = self.public_location(record);
        match self.field.formatter() {
            Some(formatter) => formatter(record, metadata, &href),
            None => href,
        }
    }

    /// Clear all metadata fields. Never touches the physical artifact.
    pub fn reset(&self, record: &mut dyn Record) {
        record.set_metadata(StoredMetadata::cleared());
    }

    /// Delete the physical artifact (when present), then clear the
    /// metadata. A deletion failure aborts before the reset so the record
    /// never points at an artifact whose fate is unknown.
    pub async fn delete(&self, record: &mut dyn Record) -> Result<(), UploadError> {
        let present = self
            .exists(record)
            .await
            .map_err(|e| UploadError::Relocation(e.to_string()))?;

        if present {
            let metadata = record.metadata();
            let address = paths::join(&metadata.storage_path, &metadata.file_name);
            self.storage.delete_file(&address).await.map_err(|e| {
                tracing::error!(
                    record_id = %record.id(),
                    address = %address,
                    error = %e,
                    "Failed to delete artifact"
                );
                UploadError::Relocation(e.to_string())
            })?;

            tracing::info!(record_id = %record.id(), address = %address, "Artifact deleted");
        }

        self.reset(record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relokit_core::InMemoryRecord;
    use relokit_storage::MemoryStorage;

    fn populated_record() -> InMemoryRecord {
        InMemoryRecord::with_metadata(StoredMetadata {
            file_name: "photo.png".to_string(),
            storage_path: "uploads".to_string(),
            size: 4,
            content_type: "image/png".to_string(),
        })
    }

    fn field() -> FieldDefinition {
        FieldDefinition::builder().destination("uploads").build().unwrap()
    }

    #[tokio::test]
    async fn test_empty_record_has_no_artifact() {
        let storage = MemoryStorage::new();
        let field = field();
        let state = ArtifactState::new(&field, &storage);
        let record = InMemoryRecord::new();

        assert!(!state.exists(&record).await.unwrap());
        assert_eq!(state.public_location(&record), "");
        assert_eq!(state.render(&record), "");
    }

    #[tokio::test]
    async fn test_exists_requires_physical_presence() {
        let storage = MemoryStorage::new();
        let field = field();
        let state = ArtifactState::new(&field, &storage);
        let record = populated_record();

        // Metadata points somewhere, but storage holds nothing.
        assert!(!state.exists(&record).await.unwrap());

        storage.put("uploads/photo.png", b"data".to_vec()).await;
        assert!(state.exists(&record).await.unwrap());
    }

    #[tokio::test]
    async fn test_public_location_prefers_prefix() {
        let storage = MemoryStorage::new();
        let record = populated_record();

        let plain = field();
        assert_eq!(
            ArtifactState::new(&plain, &storage).public_location(&record),
            "uploads/photo.png"
        );

        let prefixed = FieldDefinition::builder()
            .destination("uploads")
            .public_prefix("https://cdn.example.com/media")
            .build()
            .unwrap();
        assert_eq!(
            ArtifactState::new(&prefixed, &storage).public_location(&record),
            "https://cdn.example.com/media/photo.png"
        );
    }

    #[tokio::test]
    async fn test_render_uses_formatter() {
        let storage = MemoryStorage::new();
        let record = populated_record();

        let field = FieldDefinition::builder()
            .destination("uploads")
            .formatter(|_record, metadata, href| {
                format!("<img src=\"{}\" alt=\"{}\">", href, metadata.file_name)
            })
            .build()
            .unwrap();

        assert_eq!(
            ArtifactState::new(&field, &storage).render(&record),
            "<img src=\"uploads/photo.png\" alt=\"photo.png\">"
        );
    }

    #[tokio::test]
    async fn test_reset_clears_metadata_only() {
        let storage = MemoryStorage::new();
        storage.put("uploads/photo.png", b"data".to_vec()).await;
        let field = field();
        let state = ArtifactState::new(&field, &storage);
        let mut record = populated_record();

        state.reset(&mut record);

        assert!(record.metadata().is_empty());
        assert!(!state.exists(&record).await.unwrap());
        // Physical artifact untouched.
        assert!(storage.exists("uploads/photo.png").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_removes_artifact_and_clears() {
        let storage = MemoryStorage::new();
        storage.put("uploads/photo.png", b"data".to_vec()).await;
        let field = field();
        let state = ArtifactState::new(&field, &storage);
        let mut record = populated_record();

        state.delete(&mut record).await.unwrap();

        assert!(record.metadata().is_empty());
        assert!(!storage.exists("uploads/photo.png").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_without_artifact_still_resets() {
        let storage = MemoryStorage::new();
        let field = field();
        let state = ArtifactState::new(&field, &storage);
        // Metadata set, but no physical artifact: no delete call is issued
        // (MemoryStorage would error on a missing path), only the reset runs.
        let mut record = populated_record();

        state.delete(&mut record).await.unwrap();
        assert!(record.metadata().is_empty());
    }
}
