//! Local file-backed storage adapter.
//!
//! One JSON file per collection, shaped as `{ "<id>": { ...record } }`.
//! The medium is synchronous filesystem I/O exposed through the async
//! contract; operations are short enough that blocking the executor is
//! acceptable for a single-user desktop process.
//!
//! Failure surface: [`StorageError::Serialization`] when the stored file
//! is malformed, [`StorageError::BackendUnavailable`] for I/O failures
//! (permissions, disk full).

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use super::{BackendKind, StorageAdapter};
use crate::document::{Document, ID_FIELD, Patch, merge_into};
use crate::error::StorageError;

/// Return the soiree data directory.
///
/// Always uses XDG layout: `$XDG_DATA_HOME/soiree` or `~/.local/share/soiree`.
pub fn data_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(xdg).join("soiree");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".local")
        .join("share")
        .join("soiree")
}

/// Storage adapter over a keyed JSON file.
#[derive(Debug)]
pub struct LocalAdapter {
    collection: String,
    path: PathBuf,
}

impl LocalAdapter {
    /// Adapter for a collection under the default data directory.
    pub fn new(collection: impl Into<String>) -> Self {
        Self::with_dir(data_dir(), collection)
    }

    /// Adapter rooted at an explicit directory (tests, CLI overrides).
    pub fn with_dir(dir: impl AsRef<Path>, collection: impl Into<String>) -> Self {
        let collection = collection.into();
        let path = dir.as_ref().join(format!("{collection}.json"));
        Self { collection, path }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, Document>, StorageError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            // A collection that has never been written is simply empty.
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(StorageError::BackendUnavailable(format!(
                    "failed to read {}: {e}",
                    self.path.display()
                )));
            }
        };

        serde_json::from_str(&contents).map_err(|e| {
            StorageError::Serialization(format!(
                "malformed store file {}: {e}",
                self.path.display()
            ))
        })
    }

    fn store(&self, records: &BTreeMap<String, Document>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StorageError::BackendUnavailable(format!(
                    "failed to create {}: {e}",
                    parent.display()
                ))
            })?;
        }
        let contents = serde_json::to_string_pretty(records)?;
        std::fs::write(&self.path, contents).map_err(|e| {
            StorageError::BackendUnavailable(format!(
                "failed to write {}: {e}",
                self.path.display()
            ))
        })
    }
}

#[async_trait]
impl StorageAdapter for LocalAdapter {
    fn kind(&self) -> BackendKind {
        BackendKind::Local
    }

    async fn list(&self) -> Result<Vec<Document>, StorageError> {
        Ok(self.load()?.into_values().collect())
    }

    async fn get(&self, id: &str) -> Result<Document, StorageError> {
        self.load()?
            .remove(id)
            .ok_or_else(|| StorageError::not_found(&self.collection, id))
    }

    async fn create(&self, mut data: Document) -> Result<Document, StorageError> {
        let mut records = self.load()?;
        let id = Uuid::new_v4().to_string();
        data.insert(ID_FIELD.into(), Value::String(id.clone()));
        records.insert(id, data.clone());
        self.store(&records)?;
        Ok(data)
    }

    async fn update(&self, id: &str, patch: Patch) -> Result<Document, StorageError> {
        let mut records = self.load()?;
        let doc = records
            .get_mut(id)
            .ok_or_else(|| StorageError::not_found(&self.collection, id))?;
        merge_into(doc, &patch);
        let updated = doc.clone();
        self.store(&records)?;
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<(), StorageError> {
        let mut records = self.load()?;
        if records.remove(id).is_some() {
            self.store(&records)?;
        }
        Ok(())
    }
}
