//! Request-to-action translation.
//!
//! [`RequestAction`] inspects an inbound action token and file set (already
//! decoded by the HTTP layer, which is not this crate's concern) and routes
//! to delete/reset and/or the move pipeline. Exactly one terminal outcome
//! is produced per call.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use relokit_core::{Record, StoredMetadata, UploadDescriptor, UploadError};
use relokit_storage::Storage;

use crate::artifact::ArtifactState;
use crate::field::FieldDefinition;
use crate::move_op::MoveOperation;

/// Default name of the upload slot in the inbound file set.
pub const DEFAULT_UPLOAD_SLOT: &str = "upload";

/// Inbound form submission shape: an optional action token and a file set
/// keyed by slot name. Consumed, not owned — multipart decoding happens
/// upstream.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadRequest {
    pub action: Option<String>,
    pub files: HashMap<String, Vec<UploadDescriptor>>,
}

impl UploadRequest {
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn with_file(mut self, slot: impl Into<String>, descriptor: UploadDescriptor) -> Self {
        self.files.entry(slot.into()).or_default().push(descriptor);
        self
    }
}

/// The record-level action a request token mapped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordAction {
    Delete,
    Reset,
}

/// What one dispatch did: the applied record action (if any) and the
/// metadata of a completed upload (if any). Both may be present — a delete
/// or reset applies first, then an upload may repopulate the field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestOutcome {
    pub action: Option<RecordAction>,
    pub uploaded: Option<StoredMetadata>,
}

impl RequestOutcome {
    /// True when the request carried neither a recognized action nor a file.
    pub fn is_noop(&self) -> bool {
        self.action.is_none() && self.uploaded.is_none()
    }
}

pub struct RequestAction {
    field: Arc<FieldDefinition>,
    storage: Arc<dyn Storage>,
    slot: String,
}

impl RequestAction {
    pub fn new(field: Arc<FieldDefinition>, storage: Arc<dyn Storage>) -> Self {
        Self::with_slot(field, storage, DEFAULT_UPLOAD_SLOT)
    }

    pub fn with_slot(
        field: Arc<FieldDefinition>,
        storage: Arc<dyn Storage>,
        slot: impl Into<String>,
    ) -> Self {
        Self {
            field,
            storage,
            slot: slot.into(),
        }
    }

    /// Handle one inbound submission against a record.
    ///
    /// The action token is matched exactly and case-sensitively against
    /// `delete` and `reset`; anything else is ignored. When the upload slot
    /// holds descriptors, the first one is uploaded with
    /// `apply_to_record = true`. An action failure aborts the dispatch
    /// before any upload, so the single outcome never mixes a failure with
    /// a success.
    pub async fn handle(
        &self,
        record: &mut dyn Record,
        request: &UploadRequest,
    ) -> Result<RequestOutcome, UploadError> {
        let mut outcome = RequestOutcome::default();

        let artifact = ArtifactState::new(&self.field, self.storage.as_ref());
        match request.action.as_deref() {
            Some("delete") => {
                artifact.delete(record).await?;
                outcome.action = Some(RecordAction::Delete);
            }
            Some("reset") => {
                artifact.reset(record);
                outcome.action = Some(RecordAction::Reset);
            }
            Some(other) => {
                tracing::debug!(record_id = %record.id(), action = %other, "Ignoring unknown action token");
            }
            None => {}
        }

        if let Some(descriptor) = request.files.get(&self.slot).and_then(|slot| slot.first()) {
            let mover = MoveOperation::new(self.field.clone(), self.storage.clone());
            let metadata = mover.upload(record, descriptor, true).await?;
            outcome.uploaded = Some(metadata);
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relokit_core::InMemoryRecord;
    use relokit_storage::MemoryStorage;

    fn field() -> Arc<FieldDefinition> {
        Arc::new(FieldDefinition::builder().destination("uploads").build().unwrap())
    }

    fn descriptor(staging: &str, name: &str) -> UploadDescriptor {
        UploadDescriptor {
            staging_path: staging.to_string(),
            declared_name: name.to_string(),
            content_type: "image/png".to_string(),
            size: 4,
        }
    }

    #[tokio::test]
    async fn test_empty_request_is_noop() {
        let storage = Arc::new(MemoryStorage::new());
        let handler = RequestAction::new(field(), storage);
        let mut record = InMemoryRecord::new();

        let outcome = handler.handle(&mut record, &UploadRequest::default()).await.unwrap();
        assert!(outcome.is_noop());
    }

    #[tokio::test]
    async fn test_action_tokens_are_exact_and_case_sensitive() {
        let storage = Arc::new(MemoryStorage::new());
        storage.put("uploads/photo.png", b"data".to_vec()).await;
        let handler = RequestAction::new(field(), storage.clone());

        for token in ["Delete", "DELETE", "remove", "reset ", "deleted"] {
            let mut record = InMemoryRecord::with_metadata(StoredMetadata {
                file_name: "photo.png".to_string(),
                storage_path: "uploads".to_string(),
                size: 4,
                content_type: "image/png".to_string(),
            });
            let request = UploadRequest::default().with_action(token);
            let outcome = handler.handle(&mut record, &request).await.unwrap();
            assert!(outcome.is_noop(), "token {token:?} must be ignored");
            assert!(!record.metadata().is_empty());
        }

        assert!(storage.exists("uploads/photo.png").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_action() {
        let storage = Arc::new(MemoryStorage::new());
        storage.put("uploads/photo.png", b"data".to_vec()).await;
        let handler = RequestAction::new(field(), storage.clone());
        let mut record = InMemoryRecord::with_metadata(StoredMetadata {
            file_name: "photo.png".to_string(),
            storage_path: "uploads".to_string(),
            size: 4,
            content_type: "image/png".to_string(),
        });

        let request = UploadRequest::default().with_action("delete");
        let outcome = handler.handle(&mut record, &request).await.unwrap();

        assert_eq!(outcome.action, Some(RecordAction::Delete));
        assert!(outcome.uploaded.is_none());
        assert!(record.metadata().is_empty());
        assert!(!storage.exists("uploads/photo.png").await.unwrap());
    }

    #[tokio::test]
    async fn test_reset_action_keeps_artifact() {
        let storage = Arc::new(MemoryStorage::new());
        storage.put("uploads/photo.png", b"data".to_vec()).await;
        let handler = RequestAction::new(field(), storage.clone());
        let mut record = InMemoryRecord::with_metadata(StoredMetadata {
            file_name: "photo.png".to_string(),
            storage_path: "uploads".to_string(),
            size: 4,
            content_type: "image/png".to_string(),
        });

        let request = UploadRequest::default().with_action("reset");
        let outcome = handler.handle(&mut record, &request).await.unwrap();

        assert_eq!(outcome.action, Some(RecordAction::Reset));
        assert!(record.metadata().is_empty());
        assert!(storage.exists("uploads/photo.png").await.unwrap());
    }

    #[tokio::test]
    async fn test_upload_takes_first_descriptor() {
        let storage = Arc::new(MemoryStorage::new());
        storage.put("staging/a", b"good".to_vec()).await;
        storage.put("staging/b", b"bad!".to_vec()).await;
        let handler = RequestAction::new(field(), storage.clone());
        let mut record = InMemoryRecord::new();

        let request = UploadRequest::default()
            .with_file(DEFAULT_UPLOAD_SLOT, descriptor("staging/a", "first.png"))
            .with_file(DEFAULT_UPLOAD_SLOT, descriptor("staging/b", "second.png"));
        let outcome = handler.handle(&mut record, &request).await.unwrap();

        let metadata = outcome.uploaded.unwrap();
        assert_eq!(metadata.file_name, "first.png");
        assert!(storage.exists("uploads/first.png").await.unwrap());
        assert!(!storage.exists("uploads/second.png").await.unwrap());
    }

    #[tokio::test]
    async fn test_files_in_other_slots_are_ignored() {
        let storage = Arc::new(MemoryStorage::new());
        storage.put("staging/a", b"data".to_vec()).await;
        let handler = RequestAction::new(field(), storage.clone());
        let mut record = InMemoryRecord::new();

        let request =
            UploadRequest::default().with_file("attachment", descriptor("staging/a", "a.png"));
        let outcome = handler.handle(&mut record, &request).await.unwrap();

        assert!(outcome.is_noop());
        assert!(storage.exists("staging/a").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_then_upload_in_one_request() {
        let storage = Arc::new(MemoryStorage::new());
        storage.put("uploads/old.png", b"old!".to_vec()).await;
        storage.put("staging/new", b"new!".to_vec()).await;
        let handler = RequestAction::new(field(), storage.clone());
        let mut record = InMemoryRecord::with_metadata(StoredMetadata {
            file_name: "old.png".to_string(),
            storage_path: "uploads".to_string(),
            size: 4,
            content_type: "image/png".to_string(),
        });

        let request = UploadRequest::default()
            .with_action("delete")
            .with_file(DEFAULT_UPLOAD_SLOT, descriptor("staging/new", "new.png"));
        let outcome = handler.handle(&mut record, &request).await.unwrap();

        assert_eq!(outcome.action, Some(RecordAction::Delete));
        assert_eq!(outcome.uploaded.as_ref().unwrap().file_name, "new.png");
        assert!(!storage.exists("uploads/old.png").await.unwrap());
        assert!(storage.exists("uploads/new.png").await.unwrap());
        assert_eq!(record.metadata().file_name, "new.png");
    }

    #[tokio::test]
    async fn test_custom_slot_name() {
        let storage = Arc::new(MemoryStorage::new());
        storage.put("staging/a", b"data".to_vec()).await;
        let handler = RequestAction::with_slot(field(), storage.clone(), "avatar");
        let mut record = InMemoryRecord::new();

        let request = UploadRequest::default().with_file("avatar", descriptor("staging/a", "me.png"));
        let outcome = handler.handle(&mut record, &request).await.unwrap();

        assert_eq!(outcome.uploaded.unwrap().file_name, "me.png");
    }
}
