//! Managed-database storage adapter backed by PostgreSQL.
//!
//! Delegates to the JSONB document queries in `soiree-db`; each collection
//! is one `(id TEXT, data JSONB)` table, provisioned by `soiree db-init`.
//! Shallow merge comes from the JSONB `||` operator on the server side.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use soiree_db::Collection;
use soiree_db::queries::documents;

use super::{BackendKind, StorageAdapter};
use crate::document::{Document, ID_FIELD, Patch};
use crate::error::StorageError;

#[derive(Debug)]
pub struct ManagedDbAdapter {
    pool: PgPool,
    collection: Collection,
}

impl ManagedDbAdapter {
    /// Fails with [`StorageError::Validation`] if the collection name is
    /// not a safe SQL identifier.
    pub fn new(pool: PgPool, collection: &str) -> Result<Self, StorageError> {
        let collection =
            Collection::new(collection).map_err(|e| StorageError::Validation(e.to_string()))?;
        Ok(Self { pool, collection })
    }
}

/// Map a sqlx failure into the uniform taxonomy.
fn map_sqlx_err(e: sqlx::Error, collection: &Collection, id: Option<&str>) -> StorageError {
    match e {
        sqlx::Error::RowNotFound => {
            StorageError::not_found(collection.as_str(), id.unwrap_or_default())
        }
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            StorageError::Serialization(e.to_string())
        }
        // Everything else (pool timeouts, io, tls, protocol, server errors)
        // is a connectivity-class failure from the caller's point of view.
        other => StorageError::BackendUnavailable(other.to_string()),
    }
}

/// JSONB values we store are always objects; anything else means the
/// stored payload was tampered with outside this adapter.
fn into_document(value: Value, collection: &Collection) -> Result<Document, StorageError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(StorageError::Serialization(format!(
            "collection {collection} holds a non-object payload: {other}"
        ))),
    }
}

#[async_trait]
impl StorageAdapter for ManagedDbAdapter {
    fn kind(&self) -> BackendKind {
        BackendKind::ManagedDb
    }

    async fn list(&self) -> Result<Vec<Document>, StorageError> {
        let rows = documents::list_documents(&self.pool, &self.collection)
            .await
            .map_err(|e| map_sqlx_err(e, &self.collection, None))?;
        rows.into_iter()
            .map(|v| into_document(v, &self.collection))
            .collect()
    }

    async fn get(&self, id: &str) -> Result<Document, StorageError> {
        let row = documents::get_document(&self.pool, &self.collection, id)
            .await
            .map_err(|e| map_sqlx_err(e, &self.collection, Some(id)))?;
        match row {
            Some(value) => into_document(value, &self.collection),
            None => Err(StorageError::not_found(self.collection.as_str(), id)),
        }
    }

    async fn create(&self, mut data: Document) -> Result<Document, StorageError> {
        let id = Uuid::new_v4().to_string();
        data.insert(ID_FIELD.into(), Value::String(id.clone()));
        let stored = documents::insert_document(
            &self.pool,
            &self.collection,
            &id,
            &Value::Object(data),
        )
        .await
        .map_err(|e| map_sqlx_err(e, &self.collection, Some(&id)))?;
        into_document(stored, &self.collection)
    }

    async fn update(&self, id: &str, patch: Patch) -> Result<Document, StorageError> {
        // The JSONB merge would happily overwrite `id` inside `data`, so
        // strip it before it reaches the server.
        let mut map = patch.into_map();
        map.remove(ID_FIELD);

        let row = documents::merge_document(&self.pool, &self.collection, id, &Value::Object(map))
            .await
            .map_err(|e| map_sqlx_err(e, &self.collection, Some(id)))?;
        match row {
            Some(value) => into_document(value, &self.collection),
            None => Err(StorageError::not_found(self.collection.as_str(), id)),
        }
    }

    async fn delete(&self, id: &str) -> Result<(), StorageError> {
        documents::delete_document(&self.pool, &self.collection, id)
            .await
            .map_err(|e| map_sqlx_err(e, &self.collection, Some(id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn collection() -> Collection {
        Collection::new("plans").unwrap()
    }

    #[test]
    fn row_not_found_maps_to_not_found() {
        let e = map_sqlx_err(sqlx::Error::RowNotFound, &collection(), Some("p1"));
        assert!(matches!(e, StorageError::NotFound { .. }));
    }

    #[test]
    fn pool_timeout_maps_to_backend_unavailable() {
        let e = map_sqlx_err(sqlx::Error::PoolTimedOut, &collection(), None);
        assert!(e.is_retryable(), "pool timeout should be retryable: {e:?}");
    }

    #[test]
    fn non_object_payload_is_a_serialization_error() {
        let e = into_document(json!([1, 2, 3]), &collection()).unwrap_err();
        assert!(matches!(e, StorageError::Serialization(_)));
    }

    #[test]
    fn invalid_collection_name_is_rejected_without_a_pool_roundtrip() {
        // Constructing the adapter validates the name eagerly; there is no
        // pool to connect to here and none is needed.
        let err = Collection::new("plans; DROP TABLE x").unwrap_err();
        let e = StorageError::Validation(err.to_string());
        assert!(matches!(e, StorageError::Validation(_)));
    }
}
