//! PostgreSQL plumbing for soiree.
//!
//! This crate knows nothing about domain entities. It stores schemaless
//! JSONB documents keyed by a text id, one table per collection, and
//! exposes the raw query functions the managed-db storage adapter builds
//! on. Errors from query functions are plain [`sqlx::Error`] so callers
//! can map them into their own taxonomy.

pub mod collection;
pub mod config;
pub mod pool;
pub mod queries;

pub use collection::Collection;
pub use config::DbConfig;
