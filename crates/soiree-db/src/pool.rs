use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Executor, PgPool};
use tracing::info;

use crate::collection::Collection;
use crate::config::DbConfig;
use crate::queries::documents;

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

async fn connect(url: &str, max_connections: u32) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(url)
        .await
        .with_context(|| format!("failed to connect to database at {url}"))
}

/// Create the working connection pool for the target database.
pub async fn create_pool(config: &DbConfig) -> Result<PgPool> {
    connect(config.url(), 5).await
}

/// Create the target database if it does not exist yet.
///
/// Issues `CREATE DATABASE` through the `postgres` maintenance database;
/// the name is validated by [`DbConfig::validated_database_name`] before
/// it is interpolated into DDL.
pub async fn ensure_database_exists(config: &DbConfig) -> Result<()> {
    let db_name = config.validated_database_name()?;
    let maint_pool = connect(&config.maintenance_url(), 1).await?;

    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(db_name.as_str())
            .fetch_one(&maint_pool)
            .await
            .context("failed to query pg_database")?;

    if exists {
        info!(db = %db_name, "database already exists");
    } else {
        maint_pool
            .execute(format!("CREATE DATABASE {db_name}").as_str())
            .await
            .with_context(|| format!("failed to create database {db_name}"))?;
        info!(db = %db_name, "database created");
    }

    maint_pool.close().await;
    Ok(())
}

/// Provision every collection in `collections`, then return the row count
/// for each. Useful for the `soiree db-init` success message.
pub async fn provision_collections(
    pool: &PgPool,
    collections: &[Collection],
) -> Result<Vec<(String, i64)>> {
    let mut counts = Vec::with_capacity(collections.len());
    for collection in collections {
        documents::ensure_collection(pool, collection)
            .await
            .with_context(|| format!("failed to provision collection {collection}"))?;

        // Collection names are validated identifiers, safe to interpolate.
        let query = format!("SELECT COUNT(*) FROM {collection}");
        let count: (i64,) = sqlx::query_as(&query)
            .fetch_one(pool)
            .await
            .with_context(|| format!("failed to count rows in {collection}"))?;
        counts.push((collection.to_string(), count.0));
    }
    Ok(counts)
}
