//! The generic CRUD facade, one instance per entity type.
//!
//! Delegates every operation to whichever adapter the factory resolved and
//! adds nothing but the typed boundary: entity <-> document conversion,
//! timestamp maintenance, and id hygiene. Adapter errors propagate
//! unchanged; recovery is the caller's decision.

use std::marker::PhantomData;
use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;

use crate::document::{Patch, from_document, to_document, ID_FIELD};
use crate::entity::Entity;
use crate::error::StorageError;
use crate::storage::{AdapterFactory, StorageAdapter, StorageConfig};

pub struct CrudService<T: Entity> {
    adapter: Arc<dyn StorageAdapter>,
    _entity: PhantomData<T>,
}

fn now_value() -> Value {
    // DateTime<Utc> serializes to an RFC 3339 string.
    serde_json::to_value(Utc::now()).unwrap_or(Value::Null)
}

impl<T: Entity> CrudService<T> {
    /// Build the service for `config`, resolving the adapter through the
    /// factory.
    pub fn new(factory: &AdapterFactory, config: StorageConfig) -> Result<Self, StorageError> {
        Ok(Self::from_adapter(factory.resolve(&config)?))
    }

    /// Build the service over an already-resolved adapter.
    pub fn from_adapter(adapter: Arc<dyn StorageAdapter>) -> Self {
        Self {
            adapter,
            _entity: PhantomData,
        }
    }

    pub async fn list(&self) -> Result<Vec<T>, StorageError> {
        self.adapter
            .list()
            .await?
            .into_iter()
            .map(from_document)
            .collect()
    }

    pub async fn get(&self, id: &str) -> Result<T, StorageError> {
        from_document(self.adapter.get(id).await?)
    }

    /// Persist a new record. Any caller-supplied id is discarded (the
    /// adapter assigns identity); `created_at`/`updated_at` are stamped
    /// here, not by the adapter.
    pub async fn create(&self, data: T) -> Result<T, StorageError> {
        let mut doc = to_document(&data)?;
        doc.remove(ID_FIELD);
        let now = now_value();
        doc.insert("created_at".into(), now.clone());
        doc.insert("updated_at".into(), now);
        from_document(self.adapter.create(doc).await?)
    }

    /// Shallow-merge `patch` onto the stored record.
    ///
    /// Patches naming `id` are rejected: identity is assigned once and is
    /// immutable.
    pub async fn update(&self, id: &str, mut patch: Patch) -> Result<T, StorageError> {
        if patch.contains_key(ID_FIELD) {
            return Err(StorageError::Validation(
                "the id field is immutable and cannot be patched".into(),
            ));
        }
        patch.set("updated_at", now_value());
        from_document(self.adapter.update(id, patch).await?)
    }

    pub async fn delete(&self, id: &str) -> Result<(), StorageError> {
        self.adapter.delete(id).await
    }
}
