//! Subscription-plan service.
//!
//! The one read path here with a special policy is [`PlanService::active_plans`]:
//! it feeds the public pricing page, where a blank page is preferable to an
//! error page, so storage failures degrade to an empty list (logged, never
//! silently). Every mutation propagates errors so the operator gets
//! actionable feedback.

use std::sync::Arc;

use serde_json::json;
use tracing::warn;

use super::CrudService;
use crate::document::Patch;
use crate::entity::{Entity, Plan};
use crate::error::StorageError;
use crate::storage::{AdapterFactory, StorageAdapter, StorageConfig};

pub struct PlanService {
    crud: CrudService<Plan>,
}

impl PlanService {
    pub fn new(factory: &AdapterFactory) -> Result<Self, StorageError> {
        let config = StorageConfig::for_entity::<Plan>(factory.settings());
        Ok(Self {
            crud: CrudService::new(factory, config)?,
        })
    }

    pub fn from_adapter(adapter: Arc<dyn StorageAdapter>) -> Self {
        Self {
            crud: CrudService::from_adapter(adapter),
        }
    }

    pub async fn create(&self, plan: Plan) -> Result<Plan, StorageError> {
        self.crud.create(plan).await
    }

    pub async fn list(&self) -> Result<Vec<Plan>, StorageError> {
        self.crud.list().await
    }

    pub async fn get(&self, id: &str) -> Result<Plan, StorageError> {
        self.crud.get(id).await
    }

    /// Plans shown on the pricing page: active and not archived.
    ///
    /// Degrades to an empty list on any storage failure; callers must treat
    /// "storage down" and "no active plans" identically.
    pub async fn active_plans(&self) -> Vec<Plan> {
        match self.crud.list().await {
            Ok(plans) => plans
                .into_iter()
                .filter(|p| p.is_active && !p.is_archived)
                .collect(),
            Err(e) => {
                warn!(collection = Plan::COLLECTION, error = %e, "listing active plans failed, returning none");
                Vec::new()
            }
        }
    }

    /// Flip a plan's active flag. Propagates errors.
    pub async fn set_plan_status(&self, id: &str, is_active: bool) -> Result<Plan, StorageError> {
        self.crud
            .update(id, Patch::new().with("is_active", json!(is_active)))
            .await
    }

    /// Archive a plan. Archival is a flag mutation, never a delete, so
    /// historical records survive.
    pub async fn archive_plan(&self, id: &str) -> Result<Plan, StorageError> {
        self.crud
            .update(id, Patch::new().with("is_archived", json!(true)))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::BillingInterval;
    use crate::storage::fake::{FailingAdapter, MemoryAdapter};

    fn plan(name: &str, is_active: bool, is_archived: bool) -> Plan {
        let mut p = Plan::new(name, "", 9900, BillingInterval::Monthly);
        p.is_active = is_active;
        p.is_archived = is_archived;
        p
    }

    #[tokio::test]
    async fn active_plans_filters_archived_and_inactive() {
        let svc = PlanService::from_adapter(Arc::new(MemoryAdapter::new()));

        svc.create(plan("visible", true, false)).await.unwrap();
        svc.create(plan("inactive", false, false)).await.unwrap();
        svc.create(plan("archived", true, true)).await.unwrap();

        let active = svc.active_plans().await;
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "visible");
    }

    #[tokio::test]
    async fn active_plans_degrades_to_empty_on_storage_failure() {
        let svc = PlanService::from_adapter(Arc::new(FailingAdapter));
        assert!(svc.active_plans().await.is_empty());
    }

    #[tokio::test]
    async fn mutations_propagate_storage_failures() {
        let svc = PlanService::from_adapter(Arc::new(FailingAdapter));
        assert!(svc.set_plan_status("p1", false).await.is_err());
        assert!(svc.archive_plan("p1").await.is_err());
    }

    #[tokio::test]
    async fn set_plan_status_toggles_only_the_flag() {
        let svc = PlanService::from_adapter(Arc::new(MemoryAdapter::new()));
        let stored = svc.create(plan("Basic", true, false)).await.unwrap();

        let toggled = svc.set_plan_status(&stored.id, false).await.unwrap();
        assert!(!toggled.is_active);
        assert_eq!(toggled.name, stored.name);
        assert_eq!(toggled.price_cents, stored.price_cents);
    }

    #[tokio::test]
    async fn archive_is_non_destructive() {
        let svc = PlanService::from_adapter(Arc::new(MemoryAdapter::new()));
        let stored = svc.create(plan("Basic", true, false)).await.unwrap();

        svc.archive_plan(&stored.id).await.unwrap();

        // The record is still there, flagged, never removed.
        let archived = svc.get(&stored.id).await.unwrap();
        assert!(archived.is_archived);
        assert_eq!(svc.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn archiving_a_missing_plan_is_not_found() {
        let svc = PlanService::from_adapter(Arc::new(MemoryAdapter::new()));
        let err = svc.archive_plan("ghost").await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound { .. }));
    }
}
