//! Cache identity derivation
//!
//! The run list page issues several concurrent queries for the same run with
//! different `config` / `summaryMetrics` / `systemMetrics` / `history`
//! selections. Those are JSON-string fields, so a cache keyed on the bare id
//! would keep whichever fetch landed last and silently drop the rest. We
//! widen the identity instead: runs fetched without `logLines` get a digest
//! of their disambiguating fields appended to the id, so distinct partial
//! fetches occupy distinct entries. Memory traded for correctness.
//!
//! `logLines` is only selected on the single-run page, where real-time
//! updates depend on all fetches merging into one entry; its presence keeps
//! the bare id.

use serde_json::Value;
use sha2::{Digest, Sha256};

/// Typename whose partial fetches need disambiguation.
const RUN_TYPENAME: &str = "Run";

/// Derive the cache identity for a fetched entity. Returns `None` when the
/// object has no `id`, in which case the cache skips normalization for it.
pub fn cache_id(object: &Value) -> Option<String> {
    let id = object.get("id")?.as_str()?;

    if object.get("__typename").and_then(Value::as_str) == Some(RUN_TYPENAME)
        && object.get("logLines").map_or(true, Value::is_null)
    {
        let digest = disambiguation_digest(object);
        return Some(format!("{id}{digest}"));
    }

    Some(id.to_string())
}

/// Hex digest over the disambiguating fields. Absent or null fields hash as
/// empty strings so the digest stays comparable across fetch shapes. Each
/// field is length-framed before hashing; raw concatenation would let
/// ("ab", "") and ("a", "b") collide into one identity.
fn disambiguation_digest(object: &Value) -> String {
    let mut hasher = Sha256::new();
    for field in [
        str_field(object, "config"),
        str_field(object, "summaryMetrics"),
        str_field(object, "systemMetrics"),
        first_history_entry(object),
    ] {
        hasher.update(field.len().to_le_bytes());
        hasher.update(field.as_bytes());
    }
    hex::encode(hasher.finalize())
}

fn str_field<'a>(object: &'a Value, key: &str) -> &'a str {
    object.get(key).and_then(Value::as_str).unwrap_or("")
}

fn first_history_entry(object: &Value) -> &str {
    object
        .get("history")
        .and_then(Value::as_array)
        .and_then(|h| h.first())
        .and_then(Value::as_str)
        .unwrap_or("")
}

// =============================================================================
// TESTS
// =============================================================================
