//! Relokit Storage Library
//!
//! Physical-storage collaborator for the relokit pipeline. The [`Storage`]
//! trait is the only coupling point: backends move, delete and probe
//! artifacts addressed by backend-namespace paths, and every move is atomic
//! or erroring from the pipeline's perspective.
//!
//! Two backends are provided: [`LocalStorage`] over the local filesystem
//! and [`MemoryStorage`] for tests and embedding without a filesystem.

pub mod local;
pub mod memory;
pub mod paths;
pub mod traits;

pub use local::LocalStorage;
pub use memory::MemoryStorage;
pub use traits::{Storage, StorageError, StorageResult};
