//! Parameter map supplied by the caller.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Flat string-to-string parameter map.
///
/// Ordered so that anything derived from it (hashes, logs) is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamsMap(BTreeMap<String, String>);

impl ParamsMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Value when present and non-empty.
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Build from a loosely typed JSON object; non-string scalars are stringified
    /// and `null` entries are dropped.
    pub fn from_json(value: &serde_json::Value) -> Self {
        let mut params = Self::new();
        if let Some(object) = value.as_object() {
            for (key, value) in object {
                match value {
                    serde_json::Value::Null => {}
                    serde_json::Value::String(s) => {
                        params.insert(key.clone(), s.clone());
                    }
                    other => {
                        params.insert(key.clone(), other.to_string());
                    }
                }
            }
        }
        params
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ParamsMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl From<BTreeMap<String, String>> for ParamsMap {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let params = ParamsMap::new().with("query", "rust").with("empty", "");
        assert_eq!(params.get("query"), Some("rust"));
        assert_eq!(params.get("empty"), Some(""));
        assert_eq!(params.get_non_empty("empty"), None);
        assert_eq!(params.get("missing"), None);
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_iteration_is_sorted() {
        let params: ParamsMap = [("b", "2"), ("a", "1")].into_iter().collect();
        let keys: Vec<&str> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn test_from_json_stringifies_scalars() {
        let value = serde_json::json!({"n": 3, "flag": true, "s": "x", "gone": null});
        let params = ParamsMap::from_json(&value);
        assert_eq!(params.get("n"), Some("3"));
        assert_eq!(params.get("flag"), Some("true"));
        assert_eq!(params.get("s"), Some("x"));
        assert_eq!(params.get("gone"), None);
    }

    #[test]
    fn test_from_json_non_object() {
        assert!(ParamsMap::from_json(&serde_json::json!([1, 2])).is_empty());
    }

    #[test]
    fn test_serde_transparent() {
        let params = ParamsMap::new().with("k", "v");
        assert_eq!(serde_json::to_string(&params).unwrap(), r#"{"k":"v"}"#);
    }
}
