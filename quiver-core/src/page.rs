//! Page-ambient state
//!
//! The client runs inside a single-page app and leans on two browser-ish
//! facilities: a persisted key/value store (localStorage in the real app)
//! and the current location. Both sit behind small seams here so the rest of
//! the workspace stays testable headless.

use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

/// Keys the client persists in the page store.
pub mod keys {
    /// Stable identifier for the current page load; part of trace headers.
    pub const PAGE_ID: &str = "page_id";
    /// Monotonic per-page request counter for trace headers.
    pub const REQUEST_COUNT: &str = "request_count";
    /// The session token cleared on auth expiry.
    pub const ID_TOKEN: &str = "id_token";
    /// Location recorded before an auth-expiry redirect to /login.
    pub const REDIRECT: &str = "redirect";
}

/// Persisted string store (localStorage analog). Execution is
/// single-threaded and cooperative, so plain read-modify-write sequences on
/// this store are safe; implementations only need interior mutability.
pub trait PageStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory [`PageStore`] used in native contexts and tests.
#[derive(Debug, Default)]
pub struct MemoryPageStore {
    inner: Mutex<HashMap<String, String>>,
}

impl MemoryPageStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PageStore for MemoryPageStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner
            .lock()
            .map(|map| map.get(key).cloned())
            .unwrap_or(None)
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut map) = self.inner.lock() {
            map.insert(key.to_string(), value.to_string());
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut map) = self.inner.lock() {
            map.remove(key);
        }
    }
}

/// Read the persisted page identifier, minting one on first use.
pub fn page_id(store: &dyn PageStore) -> String {
    match store.get(keys::PAGE_ID) {
        Some(id) => id,
        None => {
            let id = Uuid::new_v4().to_string();
            store.set(keys::PAGE_ID, &id);
            id
        }
    }
}

/// The page's current location, captured at client construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    /// Path component, e.g. `/runs/7`.
    pub pathname: String,
    /// Full URL, recorded for post-login redirect.
    pub href: String,
    /// Query string including the leading `?`, or empty.
    pub search: String,
}

impl Location {
    pub fn new(
        pathname: impl Into<String>,
        href: impl Into<String>,
        search: impl Into<String>,
    ) -> Self {
        Self {
            pathname: pathname.into(),
            href: href.into(),
            search: search.into(),
        }
    }

    /// First value for a query parameter, percent-decoded. A bare flag
    /// (`?trace`) yields an empty string.
    pub fn query_param(&self, name: &str) -> Option<String> {
        parse_query(&self.search)
            .into_iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    pub fn has_param(&self, name: &str) -> bool {
        self.query_param(name).is_some()
    }
}

/// Parse a query string (with or without the leading `?`) into decoded
/// key/value pairs. Malformed percent-escapes leave the raw text in place.
pub fn parse_query(search: &str) -> Vec<(String, String)> {
    let trimmed = search.strip_prefix('?').unwrap_or(search);
    trimmed
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = match pair.split_once('=') {
                Some((k, v)) => (k, v),
                None => (pair, ""),
            };
            (decode(key), decode(value))
        })
        .collect()
}

fn decode(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryPageStore::new();
        assert_eq!(store.get(keys::ID_TOKEN), None);

        store.set(keys::ID_TOKEN, "jwt");
        assert_eq!(store.get(keys::ID_TOKEN).as_deref(), Some("jwt"));

        store.remove(keys::ID_TOKEN);
        assert_eq!(store.get(keys::ID_TOKEN), None);
    }

    #[test]
    fn test_page_id_minted_once() {
        let store = MemoryPageStore::new();
        let first = page_id(&store);
        let second = page_id(&store);
        assert_eq!(first, second);
        assert_eq!(store.get(keys::PAGE_ID), Some(first));
    }

    #[test]
    fn test_parse_query_pairs_and_flags() {
        let pairs = parse_query("?token=abc%20def&trace&x=1");
        assert_eq!(
            pairs,
            vec![
                ("token".to_string(), "abc def".to_string()),
                ("trace".to_string(), String::new()),
                ("x".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_query_empty() {
        assert!(parse_query("").is_empty());
        assert!(parse_query("?").is_empty());
    }

    #[test]
    fn test_location_params() {
        let loc = Location::new("/runs", "https://app.quiver.ai/runs?trace", "?trace");
        assert!(loc.has_param("trace"));
        assert_eq!(loc.query_param("trace").as_deref(), Some(""));
        assert!(!loc.has_param("token"));
    }
}
