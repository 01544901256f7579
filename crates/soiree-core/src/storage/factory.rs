//! Adapter resolution from configuration.
//!
//! The factory is a pure function of the runtime settings snapshot it was
//! built with: resolving the same `StorageConfig` twice within one process
//! lifetime always yields the same concrete adapter kind. Adapters are
//! constructed fresh per call; the pool and HTTP client handles they share
//! are cheap clones.

use std::path::PathBuf;
use std::sync::Arc;

use sqlx::PgPool;

use super::rest::DEFAULT_REQUEST_TIMEOUT;
use super::{BackendKind, LocalAdapter, ManagedDbAdapter, RestAdapter, StorageAdapter, StorageConfig};
use crate::error::StorageError;
use crate::runtime::{ApiMode, RuntimeSettings};

pub struct AdapterFactory {
    settings: RuntimeSettings,
    pool: Option<PgPool>,
    http: reqwest::Client,
    local_dir: Option<PathBuf>,
}

impl AdapterFactory {
    /// Build a factory over one settings snapshot.
    ///
    /// `pool` may be `None` when no database is configured; resolving a
    /// managed-db config will then fail with `BackendUnavailable`.
    pub fn new(settings: RuntimeSettings, pool: Option<PgPool>) -> Result<Self, StorageError> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_REQUEST_TIMEOUT)
            .build()
            .map_err(|e| StorageError::BackendUnavailable(e.to_string()))?;
        Ok(Self {
            settings,
            pool,
            http,
            local_dir: None,
        })
    }

    /// Root the local backend at an explicit directory instead of the
    /// default data dir.
    pub fn with_local_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.local_dir = Some(dir.into());
        self
    }

    /// The settings snapshot this factory resolves against.
    pub fn settings(&self) -> &RuntimeSettings {
        &self.settings
    }

    /// Resolve the adapter for one entity collection.
    ///
    /// When the API mode is REST, every entity goes through the REST
    /// backend at the runtime base URL, regardless of its declared kind.
    /// Otherwise the entity's declared kind wins.
    pub fn resolve(&self, config: &StorageConfig) -> Result<Arc<dyn StorageAdapter>, StorageError> {
        if self.settings.api_mode() == ApiMode::Rest {
            return Ok(self.rest_adapter(&config.collection));
        }

        match config.kind {
            BackendKind::Rest => Ok(self.rest_adapter(&config.collection)),
            BackendKind::Local => Ok(Arc::new(match &self.local_dir {
                Some(dir) => LocalAdapter::with_dir(dir, &config.collection),
                None => LocalAdapter::new(&config.collection),
            })),
            BackendKind::ManagedDb => {
                let pool = self.pool.clone().ok_or_else(|| {
                    StorageError::BackendUnavailable(
                        "no database pool configured for managed-db storage".into(),
                    )
                })?;
                Ok(Arc::new(ManagedDbAdapter::new(pool, &config.collection)?))
            }
        }
    }

    fn rest_adapter(&self, collection: &str) -> Arc<dyn StorageAdapter> {
        Arc::new(RestAdapter::new(
            self.http.clone(),
            self.settings.api_base_url(),
            collection,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::StoragePreference;

    fn direct_settings() -> RuntimeSettings {
        RuntimeSettings::new(
            StoragePreference::Local,
            ApiMode::Direct,
            "http://api.test".to_owned(),
        )
    }

    fn rest_settings() -> RuntimeSettings {
        RuntimeSettings::new(
            StoragePreference::Local,
            ApiMode::Rest,
            "http://api.test".to_owned(),
        )
    }

    #[test]
    fn resolution_is_deterministic_within_a_snapshot() {
        let factory = AdapterFactory::new(direct_settings(), None).unwrap();
        let config = StorageConfig::new(BackendKind::Local, "plans");

        let kinds: Vec<BackendKind> = (0..3)
            .map(|_| factory.resolve(&config).unwrap().kind())
            .collect();
        assert_eq!(kinds, vec![BackendKind::Local; 3]);
    }

    #[test]
    fn rest_mode_overrides_declared_kind() {
        let factory = AdapterFactory::new(rest_settings(), None).unwrap();

        for kind in [BackendKind::Local, BackendKind::ManagedDb, BackendKind::Rest] {
            let adapter = factory
                .resolve(&StorageConfig::new(kind, "plans"))
                .unwrap();
            assert_eq!(adapter.kind(), BackendKind::Rest, "declared {kind} should be intercepted");
        }
    }

    #[test]
    fn declared_rest_kind_resolves_to_rest_in_direct_mode() {
        let factory = AdapterFactory::new(direct_settings(), None).unwrap();
        let adapter = factory
            .resolve(&StorageConfig::new(BackendKind::Rest, "plans"))
            .unwrap();
        assert_eq!(adapter.kind(), BackendKind::Rest);
    }

    #[test]
    fn managed_db_without_pool_is_backend_unavailable() {
        let factory = AdapterFactory::new(direct_settings(), None).unwrap();
        let err = factory
            .resolve(&StorageConfig::new(BackendKind::ManagedDb, "plans"))
            .unwrap_err();
        assert!(matches!(err, StorageError::BackendUnavailable(_)));
    }
}
