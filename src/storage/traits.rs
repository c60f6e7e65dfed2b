use async_trait::async_trait;

use crate::storage::types::{ListDocument, ListId, ListInput, ListMetadata};

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur in storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Storage backend for lists.
///
/// Read paths degrade instead of failing: an unreadable list is reported as
/// absent and is left out of `list_all`. Only `create` and directory-level
/// failures surface as errors.
#[async_trait]
pub trait ListStore: Send + Sync {
    /// Metadata of every readable list, newest `modified` first
    async fn list_all(&self) -> StorageResult<Vec<ListMetadata>>;

    /// Full document, or `None` if the list does not exist or cannot be read
    async fn get(&self, id: &str) -> StorageResult<Option<ListDocument>>;

    /// Create a new list and return its generated id
    async fn create(&self, input: ListInput) -> StorageResult<ListId>;

    /// Replace an existing list, keeping its id and creation time.
    /// Returns `false` if the list does not exist or could not be written.
    async fn update(&self, id: &str, input: ListInput) -> StorageResult<bool>;

    /// Remove a list. Returns `false` if it does not exist or could not be removed.
    async fn delete(&self, id: &str) -> StorageResult<bool>;
}
