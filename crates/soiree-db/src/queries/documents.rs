//! Query functions for JSONB document collections.
//!
//! Every collection is a table of shape `(id TEXT PRIMARY KEY, data JSONB
//! NOT NULL)`. The `data` column always contains the full record, including
//! its `id` field, so reads never need to reassemble the row.
//!
//! Errors are returned as raw [`sqlx::Error`] so the storage adapter layer
//! can map them into its own taxonomy without string matching.

use serde_json::Value;
use sqlx::PgPool;

use crate::collection::Collection;

/// Create the backing table for a collection if it does not exist yet.
pub async fn ensure_collection(pool: &PgPool, collection: &Collection) -> Result<(), sqlx::Error> {
    // Collection names are validated identifiers, safe to interpolate.
    let stmt = format!(
        "CREATE TABLE IF NOT EXISTS {collection} (id TEXT PRIMARY KEY, data JSONB NOT NULL)"
    );
    sqlx::query(&stmt).execute(pool).await?;
    Ok(())
}

/// Fetch all documents in a collection. No ordering is guaranteed.
pub async fn list_documents(pool: &PgPool, collection: &Collection) -> Result<Vec<Value>, sqlx::Error> {
    let query = format!("SELECT data FROM {collection}");
    let rows: Vec<(Value,)> = sqlx::query_as(&query).fetch_all(pool).await?;
    Ok(rows.into_iter().map(|(data,)| data).collect())
}

/// Fetch a single document by id. Returns `None` if absent.
pub async fn get_document(
    pool: &PgPool,
    collection: &Collection,
    id: &str,
) -> Result<Option<Value>, sqlx::Error> {
    let query = format!("SELECT data FROM {collection} WHERE id = $1");
    let row: Option<(Value,)> = sqlx::query_as(&query).bind(id).fetch_optional(pool).await?;
    Ok(row.map(|(data,)| data))
}

/// Insert a new document under the given id. Returns the stored document.
pub async fn insert_document(
    pool: &PgPool,
    collection: &Collection,
    id: &str,
    data: &Value,
) -> Result<Value, sqlx::Error> {
    let query = format!("INSERT INTO {collection} (id, data) VALUES ($1, $2) RETURNING data");
    let (stored,): (Value,) = sqlx::query_as(&query)
        .bind(id)
        .bind(data)
        .fetch_one(pool)
        .await?;
    Ok(stored)
}

/// Shallow-merge `patch` onto the document with the given id.
///
/// Uses the JSONB `||` operator: top-level keys in `patch` overwrite the
/// stored keys, all other keys are untouched. Returns `None` if no document
/// with that id exists.
pub async fn merge_document(
    pool: &PgPool,
    collection: &Collection,
    id: &str,
    patch: &Value,
) -> Result<Option<Value>, sqlx::Error> {
    let query = format!("UPDATE {collection} SET data = data || $2 WHERE id = $1 RETURNING data");
    let row: Option<(Value,)> = sqlx::query_as(&query)
        .bind(id)
        .bind(patch)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|(data,)| data))
}

/// Delete a document by id. Deleting a nonexistent id is not an error.
pub async fn delete_document(
    pool: &PgPool,
    collection: &Collection,
    id: &str,
) -> Result<(), sqlx::Error> {
    let query = format!("DELETE FROM {collection} WHERE id = $1");
    sqlx::query(&query).bind(id).execute(pool).await?;
    Ok(())
}
