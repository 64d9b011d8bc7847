//! Hook interfaces for the upload pipeline.
//!
//! Hooks are the extension point external code uses to observe and veto an
//! upload. They run as an explicit ordered chain driven one at a time by the
//! pipeline: pre-move hooks run before the physical relocation and may veto
//! it; post-move hooks run after it and can only observe. The suspension
//! points are exactly "between hook N and hook N+1".

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::UploadError;
use crate::models::{Record, StoredMetadata, UploadDescriptor};

/// The two pipeline points a hook can attach to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HookPhase {
    PreMove,
    PostMove,
}

impl fmt::Display for HookPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookPhase::PreMove => write!(f, "pre-move"),
            HookPhase::PostMove => write!(f, "post-move"),
        }
    }
}

impl FromStr for HookPhase {
    type Err = UploadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pre-move" => Ok(HookPhase::PreMove),
            "post-move" => Ok(HookPhase::PostMove),
            other => Err(UploadError::UnsupportedPhase(other.to_string())),
        }
    }
}

/// Context provided to hooks during execution.
///
/// Hooks may mutate the record (e.g. to stamp audit fields) but must not
/// mutate the descriptor: it has already been validated by the time any
/// hook sees it. `metadata` is `Some` only for post-move hooks and carries
/// the final committed metadata.
pub struct HookContext<'a> {
    pub record: &'a mut dyn Record,
    pub descriptor: &'a UploadDescriptor,
    pub metadata: Option<&'a StoredMetadata>,
}

/// Trait that all upload hooks implement.
///
/// Returning `Err` from a pre-move hook vetoes the upload before any
/// physical side effect; returning `Err` from a post-move hook reports the
/// operation as failed even though the relocation already committed.
#[async_trait]
pub trait UploadHook: Send + Sync {
    /// Name used in error reporting and log fields.
    fn name(&self) -> &str;

    /// Execute the hook at its registered pipeline point.
    async fn invoke(&self, context: HookContext<'_>) -> anyhow::Result<()>;
}
