//! Admin API request/response models

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A field accepting either a single value or a list
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    /// A single value
    One(T),
    /// A list of values
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    /// Normalize to a list
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
    }
}

/// Body of `POST /cache/write`
#[derive(Debug, Deserialize)]
pub struct WriteBody {
    /// Glob patterns selecting target caches
    pub caches: OneOrMany<String>,
    /// Namespace applied to every key
    pub namespace: String,
    /// Key/value pairs to write
    pub values: Vec<(String, Value)>,
}

/// Body of `POST /cache/evict`
#[derive(Debug, Deserialize)]
pub struct EvictBody {
    /// Glob patterns selecting target caches
    pub caches: OneOrMany<String>,
    /// Glob patterns over physical keys to evict
    #[serde(default)]
    pub sectors: Option<OneOrMany<String>>,
    /// Namespace for `keys`
    #[serde(default)]
    pub namespace: Option<String>,
    /// Logical keys to delete under `namespace`
    #[serde(default)]
    pub keys: Option<OneOrMany<String>>,
}

/// Acknowledgement body for bulk operations
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Fixed acknowledgement marker
    pub status: &'static str,
}

impl StatusResponse {
    /// The canonical success acknowledgement
    pub fn ok() -> Self {
        Self { status: "Ok!" }
    }
}

/// Error body for failed requests
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable failure description
    pub error: String,
}

/// Health probe body
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Server status marker
    pub status: &'static str,
    /// Number of registered caches
    pub caches: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_one_or_many_accepts_both_forms() {
        let one: OneOrMany<String> = serde_json::from_value(json!("sess*")).unwrap();
        assert_eq!(one.into_vec(), vec!["sess*"]);

        let many: OneOrMany<String> =
            serde_json::from_value(json!(["sessions", "users"])).unwrap();
        assert_eq!(many.into_vec(), vec!["sessions", "users"]);
    }

    #[test]
    fn test_write_body_parses_value_pairs() {
        let body: WriteBody = serde_json::from_value(json!({
            "caches": "sess*",
            "namespace": "ns1",
            "values": [["user-42", {"id": 42}]]
        }))
        .unwrap();

        assert_eq!(body.namespace, "ns1");
        assert_eq!(body.values.len(), 1);
        assert_eq!(body.values[0].0, "user-42");
        assert_eq!(body.values[0].1["id"], 42);
    }

    #[test]
    fn test_evict_body_fields_are_optional() {
        let body: EvictBody = serde_json::from_value(json!({
            "caches": ["sess*"],
            "sectors": "ns1:*"
        }))
        .unwrap();

        assert!(body.sectors.is_some());
        assert!(body.namespace.is_none());
        assert!(body.keys.is_none());
    }
}
