//! The core upload pipeline.
//!
//! Stages run strictly in sequence and short-circuit on the first failure:
//! type validation → pre-move hooks → name resolution → physical relocation
//! → metadata construction → conditional record update → post-move hooks.
//! The hook chains are split around the one irreversible action (the move):
//! pre-move hooks can veto cheaply before any side effect, post-move hooks
//! only observe — a post-move failure is reported to the caller but never
//! rolls back the relocation or the committed metadata.

use std::sync::Arc;

use relokit_core::{
    HookContext, HookPhase, Record, StoredMetadata, UploadDescriptor, UploadError,
};
use relokit_storage::{paths, Storage, StorageError};

use crate::field::FieldDefinition;

pub struct MoveOperation {
    field: Arc<FieldDefinition>,
    storage: Arc<dyn Storage>,
}

impl MoveOperation {
    pub fn new(field: Arc<FieldDefinition>, storage: Arc<dyn Storage>) -> Self {
        Self { field, storage }
    }

    /// Relocate a staged payload to the configured destination and build
    /// its metadata. With `apply_to_record` the new metadata is written
    /// onto the record as one atomic replacement before the post-move
    /// hooks run.
    pub async fn upload(
        &self,
        record: &mut dyn Record,
        descriptor: &UploadDescriptor,
        apply_to_record: bool,
    ) -> Result<StoredMetadata, UploadError> {
        // 1. Type validation, before any side effect.
        if !self.field.accepts_type(&descriptor.content_type) {
            return Err(UploadError::UnsupportedFileType(
                descriptor.content_type.clone(),
            ));
        }

        // 2. Pre-move hooks may veto while nothing has happened yet.
        self.run_hooks(HookPhase::PreMove, record, descriptor, None)
            .await?;

        // 3. Name resolution: date prefix, then naming policy.
        let final_name = self.field.resolve_name(record, &descriptor.declared_name);
        let destination = paths::join(self.field.destination(), &final_name);

        // 4. Physical relocation, the single irreversible stage.
        self.storage
            .move_file(&descriptor.staging_path, &destination, self.field.overwrite())
            .await
            .map_err(|e| match e {
                StorageError::AlreadyExists(path) => UploadError::DestinationExists(path),
                other => {
                    tracing::error!(
                        record_id = %record.id(),
                        staging_path = %descriptor.staging_path,
                        destination = %destination,
                        error = %other,
                        "Relocation failed"
                    );
                    UploadError::Relocation(other.to_string())
                }
            })?;

        tracing::info!(
            record_id = %record.id(),
            file_name = %final_name,
            destination = %destination,
            size = descriptor.size,
            "Relocation successful"
        );

        // 5. Metadata construction.
        let metadata = StoredMetadata {
            file_name: final_name,
            storage_path: self.field.destination().to_string(),
            size: descriptor.size,
            content_type: descriptor.content_type.clone(),
        };

        // 6. Conditional atomic record update.
        if apply_to_record {
            record.set_metadata(metadata.clone());
        }

        // 7. Post-move hooks observe the committed state; a failure here is
        // the operation's failure, but the artifact and metadata stay put.
        self.run_hooks(HookPhase::PostMove, record, descriptor, Some(&metadata))
            .await?;

        Ok(metadata)
    }

    /// Drive one hook chain in registration order, one hook at a time.
    /// Each hook's completion is awaited before the next begins; the first
    /// rejection aborts the rest of the chain.
    async fn run_hooks(
        &self,
        phase: HookPhase,
        record: &mut dyn Record,
        descriptor: &UploadDescriptor,
        metadata: Option<&StoredMetadata>,
    ) -> Result<(), UploadError> {
        for hook in self.field.hooks(phase) {
            tracing::debug!(phase = %phase, hook = %hook.name(), "Running upload hook");

            hook.invoke(HookContext {
                record: &mut *record,
                descriptor,
                metadata,
            })
            .await
            .map_err(|source| {
                tracing::warn!(
                    phase = %phase,
                    hook = %hook.name(),
                    error = %source,
                    "Upload hook rejected the operation"
                );
                UploadError::HookRejected {
                    phase,
                    hook: hook.name().to_string(),
                    source,
                }
            })?;
        }
        Ok(())
    }
}
