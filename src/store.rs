//! Result aggregation store
//!
//! Collects the last validated output of each agent, keyed by agent
//! name. A later successful run overwrites the earlier record; an
//! invalid payload is discarded and leaves the prior record untouched.
//! The full mapping can be persisted to disk on demand as a flat JSON
//! document, overwritten wholesale on each persist call.

#![allow(dead_code)]

use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

/// Output produced by an agent: a text value or a flat string-keyed
/// mapping. Nothing else is assumed by the controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    Text(String),
    Map(HashMap<String, serde_json::Value>),
}

impl Payload {
    /// Build a map payload from key/value pairs.
    pub fn map(entries: impl IntoIterator<Item = (String, serde_json::Value)>) -> Self {
        Payload::Map(entries.into_iter().collect())
    }

    pub fn text(value: impl Into<String>) -> Self {
        Payload::Text(value.into())
    }
}

/// Pluggable validation predicate applied before a record is stored.
pub type PayloadValidator = Box<dyn Fn(&Payload) -> bool + Send + Sync>;

/// In-memory store of per-agent results.
pub struct ResultStore {
    records: HashMap<String, Payload>,
    validator: PayloadValidator,
}

impl Default for ResultStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultStore {
    /// Create a store with the default accept-all validator.
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
            validator: Box::new(|_| true),
        }
    }

    /// Create a store with a custom validation predicate.
    pub fn with_validator(validator: PayloadValidator) -> Self {
        Self {
            records: HashMap::new(),
            validator,
        }
    }

    /// Validate and store a payload, overwriting any earlier record for
    /// the same name. An invalid payload is rejected without touching
    /// the existing record.
    pub fn record(&mut self, name: &str, payload: Payload) -> Result<(), StoreError> {
        if !(self.validator)(&payload) {
            warn!("Discarding payload from '{}': failed validation", name);
            return Err(StoreError::Invalid(name.to_string()));
        }
        debug!("Recording result for '{}'", name);
        self.records.insert(name.to_string(), payload);
        Ok(())
    }

    /// Look up the current record for an agent. Missing names are not
    /// an error.
    pub fn query(&self, name: &str) -> Option<&Payload> {
        self.records.get(name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Serialize the full mapping to `path` as a flat name->payload JSON
    /// document, replacing whatever was there.
    pub fn persist(&self, path: &Path) -> Result<(), StoreError> {
        let contents = serde_json::to_string_pretty(&self.records)
            .map_err(|e| StoreError::Serialize(e.to_string()))?;
        std::fs::write(path, contents)
            .map_err(|e| StoreError::Write(format!("{}: {}", path.display(), e)))?;
        debug!("Persisted {} record(s) to {:?}", self.records.len(), path);
        Ok(())
    }

    /// Load a previously persisted mapping. The returned store uses the
    /// default accept-all validator.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| StoreError::Read(format!("{}: {}", path.display(), e)))?;
        let records: HashMap<String, Payload> = serde_json::from_str(&contents)
            .map_err(|e| StoreError::Parse(e.to_string()))?;
        Ok(Self {
            records,
            validator: Box::new(|_| true),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_record_and_query() {
        let mut store = ResultStore::new();
        assert!(store.is_empty());
        store.record("EchoAgent", Payload::text("hello")).unwrap();

        assert_eq!(store.query("EchoAgent"), Some(&Payload::text("hello")));
        assert_eq!(store.query("Missing"), None);
    }

    #[test]
    fn test_overwrite_law() {
        let mut store = ResultStore::new();
        store.record("A", Payload::text("first")).unwrap();
        store.record("A", Payload::text("second")).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.query("A"), Some(&Payload::text("second")));
    }

    #[test]
    fn test_invalid_payload_keeps_prior_record() {
        let mut store = ResultStore::with_validator(Box::new(|p| match p {
            Payload::Text(s) => !s.is_empty(),
            Payload::Map(_) => true,
        }));

        store.record("A", Payload::text("valid")).unwrap();
        let result = store.record("A", Payload::text(""));

        assert!(matches!(result, Err(StoreError::Invalid(_))));
        assert_eq!(store.query("A"), Some(&Payload::text("valid")));
    }

    #[test]
    fn test_persist_and_reload_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data_store.json");

        let mut store = ResultStore::new();
        store.record("A", Payload::text("x")).unwrap();
        store
            .record("B", Payload::map([("k".to_string(), serde_json::json!(1))]))
            .unwrap();
        store.persist(&path).unwrap();

        let reloaded = ResultStore::load(&path).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.query("A"), Some(&Payload::text("x")));
        assert_eq!(
            reloaded.query("B"),
            Some(&Payload::map([("k".to_string(), serde_json::json!(1))]))
        );
    }

    #[test]
    fn test_persist_overwrites_wholesale() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data_store.json");

        let mut store = ResultStore::new();
        store.record("A", Payload::text("x")).unwrap();
        store.record("B", Payload::text("y")).unwrap();
        store.persist(&path).unwrap();

        let mut smaller = ResultStore::new();
        smaller.record("C", Payload::text("z")).unwrap();
        smaller.persist(&path).unwrap();

        let reloaded = ResultStore::load(&path).unwrap();
        assert_eq!(reloaded.len(), 1);
        assert!(reloaded.query("A").is_none());
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = ResultStore::load(&temp_dir.path().join("nope.json"));
        assert!(matches!(result, Err(StoreError::Read(_))));
    }

    #[test]
    fn test_payload_serde_shapes() {
        // Text serializes as a bare JSON string, maps as objects
        let text = serde_json::to_value(Payload::text("x")).unwrap();
        assert_eq!(text, serde_json::json!("x"));

        let map = serde_json::to_value(Payload::map([(
            "k".to_string(),
            serde_json::json!(1),
        )]))
        .unwrap();
        assert_eq!(map, serde_json::json!({"k": 1}));
    }
}
