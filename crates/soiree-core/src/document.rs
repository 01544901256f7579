//! Untyped record representation moved across the adapter boundary.
//!
//! The adapter trait must be object-safe, so adapters exchange JSON object
//! maps rather than generic entity types. [`crate::service::CrudService`]
//! does the typed conversion at the edge.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::StorageError;

/// A stored record: a JSON object map, carrying its `id` field inline.
pub type Document = Map<String, Value>;

/// The field every document is keyed by.
pub const ID_FIELD: &str = "id";

/// A shallow partial update: top-level keys overwrite, absent keys are
/// left untouched. The `id` field can never be patched.
#[derive(Debug, Clone, Default)]
pub struct Patch(Document);

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field to the patch, builder-style.
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.0.insert(key.into(), value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Document {
        &self.0
    }

    pub fn into_map(self) -> Document {
        self.0
    }
}

/// Serialize an entity (or any struct) into a document.
///
/// Fails with [`StorageError::Serialization`] when the value does not
/// serialize to a JSON object.
pub fn to_document<T: Serialize>(value: &T) -> Result<Document, StorageError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(StorageError::Serialization(format!(
            "expected a JSON object, got {other}"
        ))),
    }
}

/// Deserialize a document back into a typed value.
pub fn from_document<T: DeserializeOwned>(doc: Document) -> Result<T, StorageError> {
    Ok(serde_json::from_value(Value::Object(doc))?)
}

/// Shallow-merge `patch` onto `doc` in place, skipping the `id` field.
///
/// Mirrors the JSONB `||` semantics the managed-db backend gets for free:
/// every top-level key in the patch overwrites the stored key; keys absent
/// from the patch are untouched.
pub fn merge_into(doc: &mut Document, patch: &Patch) {
    for (key, value) in patch.as_map() {
        if key == ID_FIELD {
            continue;
        }
        doc.insert(key.clone(), value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn merge_overwrites_exactly_the_patched_keys() {
        let mut d = doc(json!({
            "id": "p1",
            "name": "Basic",
            "is_active": true,
            "features": ["setup", "support"],
        }));
        let patch = Patch::new().with("is_active", json!(false));

        merge_into(&mut d, &patch);

        assert_eq!(
            Value::Object(d),
            json!({
                "id": "p1",
                "name": "Basic",
                "is_active": false,
                "features": ["setup", "support"],
            })
        );
    }

    #[test]
    fn merge_never_touches_id() {
        let mut d = doc(json!({"id": "p1", "name": "Basic"}));
        let patch = Patch::new().with("id", json!("evil")).with("name", json!("Pro"));

        merge_into(&mut d, &patch);

        assert_eq!(d.get("id"), Some(&json!("p1")));
        assert_eq!(d.get("name"), Some(&json!("Pro")));
    }

    #[test]
    fn merge_can_add_new_keys() {
        let mut d = doc(json!({"id": "p1"}));
        merge_into(&mut d, &Patch::new().with("notes", json!("call back")));
        assert_eq!(d.get("notes"), Some(&json!("call back")));
    }

    #[test]
    fn to_document_rejects_non_objects() {
        let err = to_document(&42).unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }

    #[test]
    fn document_roundtrip() {
        #[derive(serde::Serialize, serde::Deserialize, PartialEq, Debug)]
        struct Sample {
            id: String,
            n: i64,
        }
        let s = Sample { id: "x".into(), n: 7 };
        let d = to_document(&s).unwrap();
        let back: Sample = from_document(d).unwrap();
        assert_eq!(back, s);
    }
}
