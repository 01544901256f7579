//! The pluggable storage layer.
//!
//! A closed set of backends behind one object-safe trait: a local JSON
//! file store, a managed PostgreSQL database, and a remote REST API. The
//! [`AdapterFactory`] picks one per entity collection from the runtime
//! settings snapshot.

mod factory;
mod local;
mod managed;
mod rest;
mod trait_def;

#[cfg(test)]
pub(crate) mod fake;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use factory::AdapterFactory;
pub use local::LocalAdapter;
pub use managed::ManagedDbAdapter;
pub use rest::{DEFAULT_REQUEST_TIMEOUT, RestAdapter};
pub use trait_def::StorageAdapter;

/// The concrete storage medium behind an adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackendKind {
    Local,
    ManagedDb,
    Rest,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Local => "local",
            Self::ManagedDb => "managed-db",
            Self::Rest => "rest",
        };
        f.write_str(s)
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(Self::Local),
            "managed-db" => Ok(Self::ManagedDb),
            "rest" => Ok(Self::Rest),
            other => Err(format!("invalid backend kind: {other:?}")),
        }
    }
}

/// Per-entity storage configuration: which backend, which collection.
///
/// One `StorageConfig` governs one entity type's CRUD service instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    pub kind: BackendKind,
    pub collection: String,
}

impl StorageConfig {
    pub fn new(kind: BackendKind, collection: impl Into<String>) -> Self {
        Self {
            kind,
            collection: collection.into(),
        }
    }

    /// Config for an entity type, backend kind taken from the runtime
    /// storage preference.
    pub fn for_entity<T: crate::entity::Entity>(settings: &crate::runtime::RuntimeSettings) -> Self {
        Self::new(settings.storage_kind().backend_kind(), T::COLLECTION)
    }
}
