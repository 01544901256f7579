//! RestAdapter integration tests against an in-process mock API.
//!
//! The mock implements the resource conventions the adapter expects:
//! `GET /{collection}`, `GET/PATCH/DELETE /{collection}/{id}`,
//! `POST /{collection}` with server-side id assignment and shallow merge.
//! Records must carry a `name` field; the mock rejects creates without one
//! so the 422 -> Validation mapping can be exercised.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use serde_json::{Map, Value, json};
use uuid::Uuid;

use soiree_core::StorageError;
use soiree_core::document::{Document, Patch};
use soiree_core::storage::{DEFAULT_REQUEST_TIMEOUT, RestAdapter, StorageAdapter};

type Store = Arc<Mutex<HashMap<String, Value>>>;

async fn list_records(State(store): State<Store>) -> Json<Vec<Value>> {
    Json(store.lock().unwrap().values().cloned().collect())
}

async fn create_record(
    State(store): State<Store>,
    Json(mut body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, String)> {
    let obj = body
        .as_object_mut()
        .ok_or((StatusCode::UNPROCESSABLE_ENTITY, "expected an object".into()))?;
    if !obj.contains_key("name") {
        return Err((StatusCode::UNPROCESSABLE_ENTITY, "name is required".into()));
    }
    let id = Uuid::new_v4().to_string();
    obj.insert("id".into(), json!(id));
    store.lock().unwrap().insert(id, body.clone());
    Ok((StatusCode::CREATED, Json(body)))
}

async fn get_record(
    State(store): State<Store>,
    Path((_collection, id)): Path<(String, String)>,
) -> Result<Json<Value>, StatusCode> {
    store
        .lock()
        .unwrap()
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn patch_record(
    State(store): State<Store>,
    Path((_collection, id)): Path<(String, String)>,
    Json(patch): Json<Map<String, Value>>,
) -> Result<Json<Value>, StatusCode> {
    let mut store = store.lock().unwrap();
    let record = store.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    let obj = record
        .as_object_mut()
        .ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;
    for (key, value) in patch {
        if key != "id" {
            obj.insert(key, value);
        }
    }
    Ok(Json(record.clone()))
}

async fn delete_record(
    State(store): State<Store>,
    Path((_collection, id)): Path<(String, String)>,
) -> StatusCode {
    match store.lock().unwrap().remove(&id) {
        Some(_) => StatusCode::NO_CONTENT,
        None => StatusCode::NOT_FOUND,
    }
}

async fn spawn_app(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn spawn_mock_api() -> String {
    let store: Store = Arc::new(Mutex::new(HashMap::new()));
    let app = Router::new()
        .route("/{collection}", get(list_records).post(create_record))
        .route(
            "/{collection}/{id}",
            get(get_record).patch(patch_record).delete(delete_record),
        )
        .with_state(store);
    spawn_app(app).await
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(DEFAULT_REQUEST_TIMEOUT)
        .build()
        .unwrap()
}

fn doc(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        other => panic!("not an object: {other}"),
    }
}

#[tokio::test]
async fn full_crud_roundtrip() {
    let base = spawn_mock_api().await;
    let adapter = RestAdapter::new(client(), base, "plans");

    assert!(adapter.list().await.unwrap().is_empty());

    let stored = adapter
        .create(doc(json!({"name": "Basic", "is_active": true})))
        .await
        .unwrap();
    let id = stored["id"].as_str().unwrap().to_owned();
    assert!(!id.is_empty(), "server should assign an id");

    // Identity is stable across gets.
    let fetched = adapter.get(&id).await.unwrap();
    assert_eq!(fetched, stored);

    // Shallow merge on the server: only the patched key changes.
    let updated = adapter
        .update(&id, Patch::new().with("is_active", json!(false)))
        .await
        .unwrap();
    assert_eq!(updated["is_active"], json!(false));
    assert_eq!(updated["name"], json!("Basic"));
    assert_eq!(updated["id"].as_str(), Some(id.as_str()));

    // Idempotent delete: second call hits the server's 404 and still succeeds.
    adapter.delete(&id).await.unwrap();
    adapter.delete(&id).await.unwrap();
    assert!(matches!(
        adapter.get(&id).await,
        Err(StorageError::NotFound { .. })
    ));
}

#[tokio::test]
async fn get_missing_record_is_not_found() {
    let base = spawn_mock_api().await;
    let adapter = RestAdapter::new(client(), base, "plans");

    let err = adapter.get("ghost").await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound { .. }));
}

#[tokio::test]
async fn update_missing_record_is_not_found() {
    let base = spawn_mock_api().await;
    let adapter = RestAdapter::new(client(), base, "plans");

    let err = adapter
        .update("ghost", Patch::new().with("x", json!(1)))
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::NotFound { .. }));
}

#[tokio::test]
async fn rejected_create_is_a_validation_error() {
    let base = spawn_mock_api().await;
    let adapter = RestAdapter::new(client(), base, "plans");

    // The mock requires a `name` field.
    let err = adapter.create(doc(json!({"price_cents": 100}))).await.unwrap_err();
    assert!(matches!(err, StorageError::Validation(_)), "got: {err:?}");
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn unreachable_server_is_backend_unavailable() {
    // Nothing listens on this port.
    let adapter = RestAdapter::new(client(), "http://127.0.0.1:1", "plans");

    let err = adapter.list().await.unwrap_err();
    assert!(
        matches!(err, StorageError::BackendUnavailable(_)),
        "got: {err:?}"
    );
    assert!(err.is_retryable());
}

#[tokio::test]
async fn missing_route_is_backend_unavailable_not_not_found() {
    // A server with no routes at all answers 404 to everything. Without a
    // record id in play that is a wrong-base-URL class of failure, and
    // list/create must never surface NotFound.
    let base = spawn_app(Router::new()).await;
    let adapter = RestAdapter::new(client(), base, "plans");

    let err = adapter.list().await.unwrap_err();
    assert!(
        matches!(err, StorageError::BackendUnavailable(_)),
        "list must never return NotFound, got: {err:?}"
    );
    assert!(err.is_retryable());

    let err = adapter
        .create(doc(json!({"name": "Basic"})))
        .await
        .unwrap_err();
    assert!(
        matches!(err, StorageError::BackendUnavailable(_)),
        "create must never return NotFound, got: {err:?}"
    );
}

#[tokio::test]
async fn server_error_is_backend_unavailable() {
    // A route that always fails.
    let app = Router::new().route(
        "/{collection}",
        get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let base = spawn_app(app).await;

    let adapter = RestAdapter::new(client(), base, "plans");
    let err = adapter.list().await.unwrap_err();
    assert!(matches!(err, StorageError::BackendUnavailable(_)));
}
