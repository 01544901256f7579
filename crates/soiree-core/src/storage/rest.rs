//! REST storage adapter.
//!
//! Talks to a remote API at `{base_url}/{collection}` with the usual
//! resource conventions: `GET` list, `GET /{id}`, `POST`, `PATCH /{id}`,
//! `DELETE /{id}`. The server owns id assignment and merge semantics.
//!
//! A 404 on `DELETE` is treated as success so the idempotence guarantee
//! holds regardless of what the server thinks about deleting twice.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::{BackendKind, StorageAdapter};
use crate::document::{Document, ID_FIELD, Patch};
use crate::error::StorageError;

/// Per-request timeout applied to the shared HTTP client. Matches the
/// database pool's acquire timeout so both network backends give up on
/// a similar schedule.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug)]
pub struct RestAdapter {
    client: reqwest::Client,
    base_url: String,
    collection: String,
}

impl RestAdapter {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        collection: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self {
            client,
            base_url,
            collection: collection.into(),
        }
    }

    fn collection_url(&self) -> String {
        format!("{}/{}", self.base_url, self.collection)
    }

    fn record_url(&self, id: &str) -> String {
        format!("{}/{}/{}", self.base_url, self.collection, id)
    }

    fn map_transport_err(&self, e: reqwest::Error) -> StorageError {
        if e.is_decode() {
            StorageError::Serialization(e.to_string())
        } else {
            StorageError::BackendUnavailable(e.to_string())
        }
    }

    /// Map an unexpected response status. `NotFound` only where the
    /// operation admits it: a 404 with no record id in play means the
    /// route itself is missing (wrong base URL, unknown collection) and
    /// is a connectivity-class failure. `list` and `create` never
    /// surface `NotFound`.
    async fn unexpected_status(
        &self,
        resp: reqwest::Response,
        id: Option<&str>,
    ) -> StorageError {
        let status = resp.status();
        match (status.as_u16(), id) {
            (404, Some(id)) => StorageError::not_found(&self.collection, id),
            (400 | 422, _) => {
                let body = resp.text().await.unwrap_or_default();
                StorageError::Validation(format!("server rejected request: {body}"))
            }
            _ => StorageError::BackendUnavailable(format!(
                "unexpected status {status} from {}",
                self.base_url
            )),
        }
    }

    fn into_document(&self, value: Value) -> Result<Document, StorageError> {
        match value {
            Value::Object(map) => Ok(map),
            other => Err(StorageError::Serialization(format!(
                "expected a JSON object from {}, got {other}",
                self.base_url
            ))),
        }
    }
}

#[async_trait]
impl StorageAdapter for RestAdapter {
    fn kind(&self) -> BackendKind {
        BackendKind::Rest
    }

    async fn list(&self) -> Result<Vec<Document>, StorageError> {
        let resp = self
            .client
            .get(self.collection_url())
            .send()
            .await
            .map_err(|e| self.map_transport_err(e))?;
        if !resp.status().is_success() {
            return Err(self.unexpected_status(resp, None).await);
        }
        let values: Vec<Value> = resp.json().await.map_err(|e| self.map_transport_err(e))?;
        values.into_iter().map(|v| self.into_document(v)).collect()
    }

    async fn get(&self, id: &str) -> Result<Document, StorageError> {
        let resp = self
            .client
            .get(self.record_url(id))
            .send()
            .await
            .map_err(|e| self.map_transport_err(e))?;
        if !resp.status().is_success() {
            return Err(self.unexpected_status(resp, Some(id)).await);
        }
        let value: Value = resp.json().await.map_err(|e| self.map_transport_err(e))?;
        self.into_document(value)
    }

    async fn create(&self, mut data: Document) -> Result<Document, StorageError> {
        // The server assigns the id.
        data.remove(ID_FIELD);
        let resp = self
            .client
            .post(self.collection_url())
            .json(&data)
            .send()
            .await
            .map_err(|e| self.map_transport_err(e))?;
        if !resp.status().is_success() {
            return Err(self.unexpected_status(resp, None).await);
        }
        let value: Value = resp.json().await.map_err(|e| self.map_transport_err(e))?;
        self.into_document(value)
    }

    async fn update(&self, id: &str, patch: Patch) -> Result<Document, StorageError> {
        let mut map = patch.into_map();
        map.remove(ID_FIELD);

        let resp = self
            .client
            .patch(self.record_url(id))
            .json(&map)
            .send()
            .await
            .map_err(|e| self.map_transport_err(e))?;
        if !resp.status().is_success() {
            return Err(self.unexpected_status(resp, Some(id)).await);
        }
        let value: Value = resp.json().await.map_err(|e| self.map_transport_err(e))?;
        self.into_document(value)
    }

    async fn delete(&self, id: &str) -> Result<(), StorageError> {
        let resp = self
            .client
            .delete(self.record_url(id))
            .send()
            .await
            .map_err(|e| self.map_transport_err(e))?;
        // 404 means the record is already gone; delete is idempotent.
        if resp.status().is_success() || resp.status().as_u16() == 404 {
            return Ok(());
        }
        Err(self.unexpected_status(resp, Some(id)).await)
    }
}
