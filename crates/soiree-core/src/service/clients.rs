//! Client (customer) service.
//!
//! Internal-facing surface: unlike the pricing page, an operator staring
//! at a client list wants to see the failure, so every operation here
//! propagates errors.

use std::sync::Arc;

use serde_json::json;

use super::CrudService;
use crate::document::Patch;
use crate::entity::Client;
use crate::error::StorageError;
use crate::storage::{AdapterFactory, StorageAdapter, StorageConfig};

pub struct ClientService {
    crud: CrudService<Client>,
}

impl ClientService {
    pub fn new(factory: &AdapterFactory) -> Result<Self, StorageError> {
        let config = StorageConfig::for_entity::<Client>(factory.settings());
        Ok(Self {
            crud: CrudService::new(factory, config)?,
        })
    }

    pub fn from_adapter(adapter: Arc<dyn StorageAdapter>) -> Self {
        Self {
            crud: CrudService::from_adapter(adapter),
        }
    }

    pub async fn create(&self, client: Client) -> Result<Client, StorageError> {
        self.crud.create(client).await
    }

    pub async fn list(&self) -> Result<Vec<Client>, StorageError> {
        self.crud.list().await
    }

    pub async fn get(&self, id: &str) -> Result<Client, StorageError> {
        self.crud.get(id).await
    }

    pub async fn active_clients(&self) -> Result<Vec<Client>, StorageError> {
        Ok(self
            .crud
            .list()
            .await?
            .into_iter()
            .filter(|c| c.is_active)
            .collect())
    }

    /// Deactivate rather than delete: history stays attached to events.
    pub async fn deactivate(&self, id: &str) -> Result<Client, StorageError> {
        self.crud
            .update(id, Patch::new().with("is_active", json!(false)))
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<(), StorageError> {
        self.crud.delete(id).await
    }
}
