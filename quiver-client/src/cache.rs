//! Entity cache
//!
//! After every successful response the client walks the payload for objects
//! carrying `__typename` and `id`, keys each by [`cache_id`], and merges its
//! fields into the existing entry (newer non-null fields win). The widened
//! identity for partially fetched runs means two concurrent fetches with
//! different field selections land in different entries instead of silently
//! overwriting each other.

use quiver_core::cache_id;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct EntityCache {
    entries: Mutex<HashMap<String, Value>>,
}

impl EntityCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk a response payload and fold every identifiable entity in.
    pub fn ingest(&self, data: &Value) {
        match data {
            Value::Object(object) => {
                if let Some(identity) = cache_id(data) {
                    self.store(identity, object);
                }
                for value in object.values() {
                    self.ingest(value);
                }
            }
            Value::Array(items) => {
                for item in items {
                    self.ingest(item);
                }
            }
            _ => {}
        }
    }

    /// Merged value for a derived identity.
    pub fn get(&self, identity: &str) -> Option<Value> {
        self.entries
            .lock()
            .map(|entries| entries.get(identity).cloned())
            .unwrap_or(None)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }

    fn store(&self, identity: String, incoming: &Map<String, Value>) {
        let Ok(mut entries) = self.entries.lock() else {
            return;
        };
        let entry = entries
            .entry(identity)
            .or_insert_with(|| Value::Object(Map::new()));
        if let Some(existing) = entry.as_object_mut() {
            for (key, value) in incoming {
                if !value.is_null() {
                    existing.insert(key.clone(), value.clone());
                }
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
