//! Error types module
//!
//! All pipeline failures are unified under the [`UploadError`] enum. Every
//! stage of an upload short-circuits on its first error and surfaces it,
//! wrapped with stage context, through the single returned `Result` — there
//! is no retry and no partial commit at this layer.

use crate::hooks::HookPhase;

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// Invalid field configuration (e.g. missing destination). Fatal at
    /// construction time, never retried.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// A hook was registered against a phase that does not exist.
    #[error("Unsupported hook phase: {0}")]
    UnsupportedPhase(String),

    /// The declared content type is not in the allowed set. Surfaced before
    /// any side effect; safe to retry with a different file.
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// Destination collision under a no-overwrite policy. Surfaced before
    /// any metadata commit; safe to retry with a different name.
    #[error("Destination already exists: {0}")]
    DestinationExists(String),

    /// A hook signalled failure. For pre-move hooks no side effect has
    /// occurred; for post-move hooks the artifact and metadata are already
    /// committed and remain so.
    #[error("{phase} hook '{hook}' rejected the operation")]
    HookRejected {
        phase: HookPhase,
        hook: String,
        #[source]
        source: anyhow::Error,
    },

    /// The underlying storage move or delete failed. Fatal for the call; no
    /// metadata mutation occurs.
    #[error("Relocation failed: {0}")]
    Relocation(String),
}

impl UploadError {
    /// True when the caller may retry the same record with different input.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            UploadError::UnsupportedFileType(_) | UploadError::DestinationExists(_)
        )
    }
}
