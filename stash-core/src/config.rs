//! Per-request configuration slot.
//!
//! Every request carries a small string-keyed map that lives exactly as long
//! as the request. Callers use it to pass hints to their own predicates
//! (for example "this request must be fresh"), and the interceptor uses it to
//! report back whether the response was replayed from the cache under
//! [`CACHED_RESPONSE_KEY`].
//!
//! ```
//! use stash_core::{CACHED_RESPONSE_KEY, RequestConfig};
//!
//! let mut config = RequestConfig::new().with("requestFresh", true);
//! assert_eq!(config.get_bool("requestFresh"), Some(true));
//! assert!(!config.served_from_cache());
//!
//! config.set(CACHED_RESPONSE_KEY, true);
//! assert!(config.served_from_cache());
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use smol_str::SmolStr;

/// Key under which the interceptor records that a response was served from
/// the cache. The value is the boolean `true`; the key is absent otherwise.
pub const CACHED_RESPONSE_KEY: &str = "has_cached_response";

/// Per-request key/value metadata.
///
/// Not persisted: created with the request, read by predicates, updated by
/// the interceptor and dropped with the request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestConfig {
    values: HashMap<SmolStr, Value>,
}

impl RequestConfig {
    /// Creates an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, key: impl Into<SmolStr>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Sets `key` to `value`, returning the previous value.
    pub fn set(&mut self, key: impl Into<SmolStr>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(key.into(), value.into())
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Returns the value stored under `key` if it is a boolean.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    /// Removes `key`, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    /// Returns `true` if `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Returns `true` if the interceptor replayed this request from the cache.
    pub fn served_from_cache(&self) -> bool {
        self.get_bool(CACHED_RESPONSE_KEY).unwrap_or(false)
    }

    /// Records that the response for this request came from the cache.
    pub fn mark_served_from_cache(&mut self) {
        self.set(CACHED_RESPONSE_KEY, true);
    }

    /// Drops a served-from-cache mark left over from an earlier exchange.
    pub fn clear_served_from_cache(&mut self) {
        self.remove(CACHED_RESPONSE_KEY);
    }

    /// Iterates over all entries.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(key, value)| (key.as_str(), value))
    }
}
