use std::env;

use anyhow::{Context, Result};

use crate::collection::Collection;

/// Connection settings for the managed PostgreSQL backend.
///
/// Resolution order: an explicit value (CLI flag), the
/// `SOIREE_DATABASE_URL` environment variable, then a localhost default.
#[derive(Debug, Clone)]
pub struct DbConfig {
    url: String,
}

impl DbConfig {
    pub const ENV_VAR: &str = "SOIREE_DATABASE_URL";
    pub const FALLBACK_URL: &str = "postgresql://localhost:5432/soiree";

    /// Resolve the connection URL, preferring `explicit` over the
    /// environment over the localhost fallback.
    pub fn resolve(explicit: Option<&str>) -> Self {
        let url = explicit
            .map(str::to_owned)
            .or_else(|| env::var(Self::ENV_VAR).ok())
            .unwrap_or_else(|| Self::FALLBACK_URL.to_owned());
        Self { url }
    }

    /// Config over a fixed URL, bypassing resolution (tests).
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Split the URL into the server root and the trailing database
    /// segment. `None` when the URL carries no database at all, e.g.
    /// `postgresql://localhost:5432` (the split would land inside the
    /// `//` of the scheme).
    fn server_and_database(&self) -> Option<(&str, &str)> {
        let (server, database) = self.url.rsplit_once('/')?;
        if database.is_empty() || server.ends_with('/') {
            return None;
        }
        Some((server, database))
    }

    /// The database name, validated against the same identifier grammar
    /// as collection names so it is safe to interpolate into
    /// `CREATE DATABASE` (identifiers cannot be parameterised).
    pub fn validated_database_name(&self) -> Result<Collection> {
        let (_, database) = self
            .server_and_database()
            .with_context(|| format!("no database name in URL {}", self.url))?;
        Collection::new(database)
            .with_context(|| format!("database name in URL {} is not a safe identifier", self.url))
    }

    /// URL of the `postgres` maintenance database on the same server,
    /// used to issue `CREATE DATABASE` before the target exists.
    pub fn maintenance_url(&self) -> String {
        match self.server_and_database() {
            Some((server, _)) => format!("{server}/postgres"),
            None => format!("{}/postgres", self.url),
        }
    }
}
