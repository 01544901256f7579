//! Domain entity types.
//!
//! Entities are plain data shapes with a unique, stable string `id`. The
//! id is assigned exactly once at creation by the storage adapter and is
//! immutable thereafter. `created_at`/`updated_at` are maintained by the
//! service layer, never by adapters.

mod models;

use serde::Serialize;
use serde::de::DeserializeOwned;

pub use models::{BillingInterval, CalendarEvent, Client, ContractTemplate, EventStatus, Plan};

/// A uniquely identified domain record.
///
/// `COLLECTION` names the table/file/REST resource the entity lives in;
/// one collection holds exactly one entity type.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const COLLECTION: &'static str;

    /// The record's identity. Empty until the record has been stored.
    fn id(&self) -> &str;
}
