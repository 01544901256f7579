//! Shared test utilities for soiree integration tests.
//!
//! Provides a PostgreSQL instance shared across tests. Each test gets its
//! own database within the instance.
//!
//! Three modes:
//! - **`SOIREE_TEST_PG_URL`** set: use the external server directly. No
//!   testcontainers overhead per process.
//! - **No env var, Docker available**: spin up a container via
//!   testcontainers, shared per binary through a `OnceCell`.
//! - **No env var, no Docker**: [`try_pg_url`] returns `None` and callers
//!   should skip their test instead of failing.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::{Executor, PgPool};
use testcontainers::ContainerAsync;
use testcontainers::ImageExt;
use testcontainers::runners::AsyncRunner;
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;
use uuid::Uuid;

/// Shared container state: base URL and optional container handle (kept alive).
struct SharedPg {
    /// `None` when PostgreSQL could not be reached or started.
    base_url: Option<String>,
    /// Held to keep the container alive. `None` when using an external URL.
    _container: Option<ContainerAsync<Postgres>>,
}

/// Lazily-initialized shared PostgreSQL.
static SHARED_PG: OnceCell<SharedPg> = OnceCell::const_new();

async fn init_shared_pg() -> SharedPg {
    // If an external server is configured, use that directly.
    if let Ok(url) = std::env::var("SOIREE_TEST_PG_URL") {
        return SharedPg {
            base_url: Some(url),
            _container: None,
        };
    }

    let started = Postgres::default().with_tag("18").start().await;
    let container = match started {
        Ok(c) => c,
        Err(e) => {
            eprintln!("could not start PostgreSQL container ({e}); database tests will be skipped");
            return SharedPg {
                base_url: None,
                _container: None,
            };
        }
    };

    let host = container.get_host().await.expect("failed to get host");
    let port = container
        .get_host_port_ipv4(5432)
        .await
        .expect("failed to get mapped port");

    let base_url = format!("postgresql://postgres:postgres@{host}:{port}");

    SharedPg {
        base_url: Some(base_url),
        _container: Some(container),
    }
}

/// Base URL for the shared PostgreSQL, or `None` when no server is reachable.
///
/// Lazily starts a container on first call (unless `SOIREE_TEST_PG_URL` is
/// set). The URL points at the server root (no database name appended).
pub async fn try_pg_url() -> Option<&'static str> {
    let shared = SHARED_PG.get_or_init(init_shared_pg).await;
    shared.base_url.as_deref()
}

/// Create a temporary empty database.
///
/// Returns `(pool, db_name)`, or `None` when no PostgreSQL is available
/// (tests should skip in that case). The pool connects to a uniquely-named
/// database within the shared instance. Call [`drop_test_db`] with the
/// returned `db_name` when the test is done.
pub async fn create_test_db() -> Option<(PgPool, String)> {
    let base_url = try_pg_url().await?;

    // Connect to the default "postgres" database to issue CREATE DATABASE.
    let maint_url = format!("{base_url}/postgres");
    let maint_pool = PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&maint_url)
        .await
        .expect("failed to connect to maintenance database");

    let db_name = format!("soiree_test_{}", Uuid::new_v4().simple());
    let stmt = format!("CREATE DATABASE {db_name}");
    maint_pool
        .execute(stmt.as_str())
        .await
        .unwrap_or_else(|e| panic!("failed to create temp database {db_name}: {e}"));
    maint_pool.close().await;

    let temp_url = format!("{base_url}/{db_name}");
    let temp_pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&temp_url)
        .await
        .unwrap_or_else(|e| panic!("failed to connect to temp database {db_name}: {e}"));

    Some((temp_pool, db_name))
}

/// Drop a temporary database.
///
/// Terminates existing connections and drops the database. Safe to call
/// even if the database was already dropped.
pub async fn drop_test_db(db_name: &str) {
    let Some(base_url) = try_pg_url().await else {
        return;
    };
    let maint_url = format!("{base_url}/postgres");

    let maint_pool = PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&maint_url)
        .await
        .expect("failed to connect to maintenance database for cleanup");

    // Terminate existing connections first.
    let terminate = format!(
        "SELECT pg_terminate_backend(pid) \
         FROM pg_stat_activity \
         WHERE datname = '{db_name}' AND pid <> pg_backend_pid()"
    );
    let _ = maint_pool.execute(terminate.as_str()).await;

    let stmt = format!("DROP DATABASE IF EXISTS {db_name}");
    let _ = maint_pool.execute(stmt.as_str()).await;
    maint_pool.close().await;
}
