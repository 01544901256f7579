//! Test doubles for the storage layer, shared by service and adapter tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use super::{BackendKind, StorageAdapter};
use crate::document::{Document, ID_FIELD, Patch, merge_into};
use crate::error::StorageError;

/// In-memory adapter honoring the full contract. Reports itself as
/// [`BackendKind::Local`].
#[derive(Debug, Default)]
pub struct MemoryAdapter {
    records: Mutex<HashMap<String, Document>>,
}

impl MemoryAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record directly, bypassing id assignment.
    pub fn seed(&self, doc: Document) {
        let id = doc
            .get(ID_FIELD)
            .and_then(|v| v.as_str())
            .expect("seeded document must carry an id")
            .to_owned();
        self.records.lock().unwrap().insert(id, doc);
    }
}

#[async_trait]
impl StorageAdapter for MemoryAdapter {
    fn kind(&self) -> BackendKind {
        BackendKind::Local
    }

    async fn list(&self) -> Result<Vec<Document>, StorageError> {
        Ok(self.records.lock().unwrap().values().cloned().collect())
    }

    async fn get(&self, id: &str) -> Result<Document, StorageError> {
        self.records
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| StorageError::not_found("memory", id))
    }

    async fn create(&self, mut data: Document) -> Result<Document, StorageError> {
        let id = Uuid::new_v4().to_string();
        data.insert(ID_FIELD.into(), serde_json::Value::String(id.clone()));
        self.records.lock().unwrap().insert(id, data.clone());
        Ok(data)
    }

    async fn update(&self, id: &str, patch: Patch) -> Result<Document, StorageError> {
        let mut records = self.records.lock().unwrap();
        let doc = records
            .get_mut(id)
            .ok_or_else(|| StorageError::not_found("memory", id))?;
        merge_into(doc, &patch);
        Ok(doc.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), StorageError> {
        self.records.lock().unwrap().remove(id);
        Ok(())
    }
}

/// Adapter whose every operation fails with `BackendUnavailable`. Used to
/// exercise error-propagation and degrade-to-empty policies.
#[derive(Debug)]
pub struct FailingAdapter;

#[async_trait]
impl StorageAdapter for FailingAdapter {
    fn kind(&self) -> BackendKind {
        BackendKind::ManagedDb
    }

    async fn list(&self) -> Result<Vec<Document>, StorageError> {
        Err(StorageError::BackendUnavailable("simulated outage".into()))
    }

    async fn get(&self, _id: &str) -> Result<Document, StorageError> {
        Err(StorageError::BackendUnavailable("simulated outage".into()))
    }

    async fn create(&self, _data: Document) -> Result<Document, StorageError> {
        Err(StorageError::BackendUnavailable("simulated outage".into()))
    }

    async fn update(&self, _id: &str, _patch: Patch) -> Result<Document, StorageError> {
        Err(StorageError::BackendUnavailable("simulated outage".into()))
    }

    async fn delete(&self, _id: &str) -> Result<(), StorageError> {
        Err(StorageError::BackendUnavailable("simulated outage".into()))
    }
}
