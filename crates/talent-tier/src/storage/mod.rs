//! File-or-memory persistence for ordered record collections.

mod backend;
mod collection;

pub use backend::StorageBackend;
pub use collection::{JsonCollection, Mutation};

/// Failure talking to durable storage. Logged by collections, never surfaced to callers.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage io failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored collection is not valid JSON: {0}")]
    Encode(#[from] serde_json::Error),
}
