//! Calendar event service.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;

use super::CrudService;
use crate::document::Patch;
use crate::entity::{CalendarEvent, EventStatus};
use crate::error::StorageError;
use crate::storage::{AdapterFactory, StorageAdapter, StorageConfig};

pub struct EventService {
    crud: CrudService<CalendarEvent>,
}

impl EventService {
    pub fn new(factory: &AdapterFactory) -> Result<Self, StorageError> {
        let config = StorageConfig::for_entity::<CalendarEvent>(factory.settings());
        Ok(Self {
            crud: CrudService::new(factory, config)?,
        })
    }

    pub fn from_adapter(adapter: Arc<dyn StorageAdapter>) -> Self {
        Self {
            crud: CrudService::from_adapter(adapter),
        }
    }

    pub async fn create(&self, event: CalendarEvent) -> Result<CalendarEvent, StorageError> {
        self.crud.create(event).await
    }

    pub async fn list(&self) -> Result<Vec<CalendarEvent>, StorageError> {
        self.crud.list().await
    }

    pub async fn get(&self, id: &str) -> Result<CalendarEvent, StorageError> {
        self.crud.get(id).await
    }

    /// Events starting within `[from, to)`, ordered by start time.
    pub async fn events_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>, StorageError> {
        let mut events: Vec<CalendarEvent> = self
            .crud
            .list()
            .await?
            .into_iter()
            .filter(|e| e.starts_at >= from && e.starts_at < to)
            .collect();
        events.sort_by_key(|e| e.starts_at);
        Ok(events)
    }

    pub async fn confirm(&self, id: &str) -> Result<CalendarEvent, StorageError> {
        self.set_status(id, EventStatus::Confirmed).await
    }

    /// Cancelling keeps the record; cancelled events stay on the books.
    pub async fn cancel(&self, id: &str) -> Result<CalendarEvent, StorageError> {
        self.set_status(id, EventStatus::Cancelled).await
    }

    pub async fn reschedule(
        &self,
        id: &str,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
    ) -> Result<CalendarEvent, StorageError> {
        if ends_at <= starts_at {
            return Err(StorageError::Validation(
                "an event must end after it starts".into(),
            ));
        }
        self.crud
            .update(
                id,
                Patch::new()
                    .with("starts_at", json!(starts_at))
                    .with("ends_at", json!(ends_at)),
            )
            .await
    }

    async fn set_status(&self, id: &str, status: EventStatus) -> Result<CalendarEvent, StorageError> {
        self.crud
            .update(id, Patch::new().with("status", json!(status)))
            .await
    }
}
