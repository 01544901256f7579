//! The error taxonomy every storage backend maps into.
//!
//! Adapters never surface backend-specific error types; upper layers must
//! be able to handle failures without branching on backend kind.

use thiserror::Error;

/// Errors surfaced uniformly by every storage adapter and by
/// [`crate::service::CrudService`].
#[derive(Debug, Error)]
pub enum StorageError {
    /// The operation referenced an id that does not exist. Returned only by
    /// `get` and `update`; `list`, `create` and `delete` never produce it.
    #[error("no record {id:?} in collection {collection:?}")]
    NotFound { collection: String, id: String },

    /// Required fields missing or malformed on `create`/`update`.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Connectivity, timeout or quota failure. Retryable at the caller's
    /// discretion; this layer never retries automatically.
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    /// A stored payload could not be decoded.
    #[error("stored payload could not be decoded: {0}")]
    Serialization(String),
}

impl StorageError {
    pub fn not_found(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            collection: collection.into(),
            id: id.into(),
        }
    }

    /// Whether retrying the operation could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::BackendUnavailable(_))
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}
