//! Contract template service.

use std::sync::Arc;

use serde_json::json;

use super::CrudService;
use crate::document::Patch;
use crate::entity::ContractTemplate;
use crate::error::StorageError;
use crate::storage::{AdapterFactory, StorageAdapter, StorageConfig};

pub struct TemplateService {
    crud: CrudService<ContractTemplate>,
}

impl TemplateService {
    pub fn new(factory: &AdapterFactory) -> Result<Self, StorageError> {
        let config = StorageConfig::for_entity::<ContractTemplate>(factory.settings());
        Ok(Self {
            crud: CrudService::new(factory, config)?,
        })
    }

    pub fn from_adapter(adapter: Arc<dyn StorageAdapter>) -> Self {
        Self {
            crud: CrudService::from_adapter(adapter),
        }
    }

    pub async fn create(&self, template: ContractTemplate) -> Result<ContractTemplate, StorageError> {
        self.crud.create(template).await
    }

    pub async fn list(&self) -> Result<Vec<ContractTemplate>, StorageError> {
        self.crud.list().await
    }

    pub async fn get(&self, id: &str) -> Result<ContractTemplate, StorageError> {
        self.crud.get(id).await
    }

    /// The template new contracts start from, if one is flagged.
    pub async fn default_template(&self) -> Result<Option<ContractTemplate>, StorageError> {
        Ok(self
            .crud
            .list()
            .await?
            .into_iter()
            .find(|t| t.is_default && !t.is_archived))
    }

    /// Make `id` the default template, clearing the flag on any other.
    ///
    /// Two separate patches, no transaction: a crash between them can leave
    /// no default flagged, which callers already tolerate (a missing
    /// default means "start from a blank contract").
    pub async fn set_default(&self, id: &str) -> Result<ContractTemplate, StorageError> {
        // Fail early with NotFound before touching the others.
        self.crud.get(id).await?;

        for other in self.crud.list().await? {
            if other.is_default && other.id != id {
                self.crud
                    .update(&other.id, Patch::new().with("is_default", json!(false)))
                    .await?;
            }
        }
        self.crud
            .update(id, Patch::new().with("is_default", json!(true)))
            .await
    }

    /// Archive a template. Never a delete; old contracts keep their source.
    pub async fn archive_template(&self, id: &str) -> Result<ContractTemplate, StorageError> {
        self.crud
            .update(id, Patch::new().with("is_archived", json!(true)))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::fake::MemoryAdapter;

    fn service() -> TemplateService {
        TemplateService::from_adapter(Arc::new(MemoryAdapter::new()))
    }

    #[tokio::test]
    async fn set_default_clears_the_previous_default() {
        let svc = service();
        let a = svc
            .create(ContractTemplate::new("Wedding", "..."))
            .await
            .unwrap();
        let b = svc
            .create(ContractTemplate::new("Corporate", "..."))
            .await
            .unwrap();

        svc.set_default(&a.id).await.unwrap();
        svc.set_default(&b.id).await.unwrap();

        let current = svc.default_template().await.unwrap().unwrap();
        assert_eq!(current.id, b.id);

        let old = svc.get(&a.id).await.unwrap();
        assert!(!old.is_default);
    }

    #[tokio::test]
    async fn set_default_on_missing_template_is_not_found() {
        let svc = service();
        let existing = svc
            .create(ContractTemplate::new("Wedding", "..."))
            .await
            .unwrap();
        svc.set_default(&existing.id).await.unwrap();

        let err = svc.set_default("ghost").await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound { .. }));

        // The existing default was not disturbed.
        let current = svc.default_template().await.unwrap().unwrap();
        assert_eq!(current.id, existing.id);
    }

    #[tokio::test]
    async fn archived_templates_are_not_the_default() {
        let svc = service();
        let t = svc
            .create(ContractTemplate::new("Wedding", "..."))
            .await
            .unwrap();
        svc.set_default(&t.id).await.unwrap();
        svc.archive_template(&t.id).await.unwrap();

        assert!(svc.default_template().await.unwrap().is_none());
        // Still stored.
        assert!(svc.get(&t.id).await.unwrap().is_archived);
    }
}
