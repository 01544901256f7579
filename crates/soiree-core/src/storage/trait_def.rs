//! The `StorageAdapter` trait -- one CRUD contract for every backend.
//!
//! Each concrete backend (local file store, PostgreSQL, REST) implements
//! this trait with identical semantics and backend-specific mechanics. The
//! trait is intentionally object-safe so the factory can hand back
//! `Arc<dyn StorageAdapter>`.

use async_trait::async_trait;

use super::BackendKind;
use crate::document::{Document, Patch};
use crate::error::StorageError;

/// Adapter interface over one storage medium for one collection.
///
/// Semantics every implementation must honor:
///
/// - ids are assigned by the adapter at `create` time and never change;
/// - `update` is a shallow merge: keys in the patch overwrite, keys absent
///   from the patch are untouched, `id` is never overwritten;
/// - `delete` is idempotent; deleting a nonexistent id succeeds silently;
/// - backend-specific failures are mapped into [`StorageError`] so callers
///   never branch on backend kind.
#[async_trait]
pub trait StorageAdapter: std::fmt::Debug + Send + Sync {
    /// Which storage medium this adapter talks to.
    fn kind(&self) -> BackendKind;

    /// All records in the collection, unordered. Empty vec, never an
    /// error, when none exist.
    async fn list(&self) -> Result<Vec<Document>, StorageError>;

    /// Fetch one record. [`StorageError::NotFound`] when the id is absent;
    /// never returns a partially-populated record.
    async fn get(&self, id: &str) -> Result<Document, StorageError>;

    /// Persist a new record, assigning a fresh unique id. Returns the full
    /// stored record including adapter-assigned fields.
    async fn create(&self, data: Document) -> Result<Document, StorageError>;

    /// Shallow-merge `patch` onto the record. [`StorageError::NotFound`]
    /// when the id does not exist.
    async fn update(&self, id: &str, patch: Patch) -> Result<Document, StorageError>;

    /// Remove a record. At-most-once semantics: repeated calls succeed.
    async fn delete(&self, id: &str) -> Result<(), StorageError>;
}

// Compile-time assertion: StorageAdapter must be object-safe.
// If this line compiles, the trait can be used as `dyn StorageAdapter`.
const _: () = {
    fn _assert_object_safe(_: &dyn StorageAdapter) {}
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::fake::MemoryAdapter;
    use serde_json::json;

    #[test]
    fn adapter_is_object_safe() {
        // If this compiles, the trait is object-safe.
        let adapter: Box<dyn StorageAdapter> = Box::new(MemoryAdapter::new());
        assert_eq!(adapter.kind(), BackendKind::Local);
    }

    #[tokio::test]
    async fn contract_smoke_via_trait_object() {
        let adapter: Box<dyn StorageAdapter> = Box::new(MemoryAdapter::new());

        assert!(adapter.list().await.unwrap().is_empty());

        let mut doc = Document::new();
        doc.insert("name".into(), json!("Basic"));
        let stored = adapter.create(doc).await.unwrap();
        let id = stored["id"].as_str().unwrap().to_owned();
        assert!(!id.is_empty());

        let fetched = adapter.get(&id).await.unwrap();
        assert_eq!(fetched, stored);

        adapter.delete(&id).await.unwrap();
        adapter.delete(&id).await.unwrap();
        assert!(matches!(
            adapter.get(&id).await,
            Err(StorageError::NotFound { .. })
        ));
    }
}
