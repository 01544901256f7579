//! Core of the soiree backend: entity types, the pluggable storage layer,
//! and the domain services built on top of it.
//!
//! Layering, leaves first:
//!
//! 1. [`entity`] -- plain data shapes with a string identity.
//! 2. [`storage`] -- the [`storage::StorageAdapter`] contract and its three
//!    backends (local file store, PostgreSQL, remote REST API), plus the
//!    [`storage::AdapterFactory`] that picks one from configuration.
//! 3. [`service::CrudService`] -- the backend-agnostic facade; the only
//!    thing domain services are allowed to depend on.
//! 4. [`service`] -- entity-specific services (plans, clients, events,
//!    contract templates) composed purely from `CrudService` calls.
//! 5. [`runtime`] -- durable process-wide settings selecting the active
//!    backend; changes take effect on the next process start.

pub mod document;
pub mod entity;
pub mod error;
pub mod runtime;
pub mod service;
pub mod storage;

pub use error::StorageError;
