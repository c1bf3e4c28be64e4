//! Cache key types and construction.
//!
//! This module provides types for building and representing request
//! fingerprints:
//!
//! - [`CacheKey`] - The complete cache key with prefix, version, and parts
//! - [`KeyPart`] - A single key-value component of a cache key
//! - [`KeyParts`] - Builder for accumulating key parts during extraction
//!
//! ## Format
//!
//! When displayed, keys follow this format:
//! `{prefix}:v{version}:key1=value1&key2=value2`
//!
//! - Prefix is omitted if empty
//! - Version is omitted if zero
//!
//! ```
//! use stash_core::{CacheKey, KeyPart};
//!
//! let key = CacheKey::new("api", 1, vec![KeyPart::new("method", Some("GET"))]);
//! assert_eq!(format!("{}", key), "api:v1:method=GET");
//!
//! let key = CacheKey::new("", 0, vec![
//!     KeyPart::new("method", Some("GET")),
//!     KeyPart::new("header:accept", None::<&str>),
//! ]);
//! assert_eq!(format!("{}", key), "method=GET&header:accept");
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
struct CacheKeyInner {
    parts: Vec<KeyPart>,
    version: u32,
    prefix: SmolStr,
}

/// A cache key identifying a cached entry.
///
/// Cache keys are composed of:
/// - A **prefix** for namespacing (e.g., "api", "users")
/// - A **version** number for bulk invalidation
/// - A list of **parts** (key-value pairs) extracted from requests
///
/// `CacheKey` wraps its data in [`Arc`], so cloning only bumps a reference
/// count. Two keys are equal when prefix, version and all parts (in order)
/// are equal.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(from = "CacheKeyInner", into = "CacheKeyInner")]
pub struct CacheKey {
    inner: Arc<CacheKeyInner>,
}

impl PartialEq for CacheKey {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner) || self.inner == other.inner
    }
}

impl Eq for CacheKey {}

impl Hash for CacheKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.hash(state);
    }
}

impl From<CacheKeyInner> for CacheKey {
    fn from(inner: CacheKeyInner) -> Self {
        CacheKey {
            inner: Arc::new(inner),
        }
    }
}

impl From<CacheKey> for CacheKeyInner {
    fn from(key: CacheKey) -> Self {
        Arc::try_unwrap(key.inner).unwrap_or_else(|arc| (*arc).clone())
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.inner.prefix.is_empty() {
            write!(f, "{}:", self.inner.prefix)?;
        }
        if self.inner.version > 0 {
            write!(f, "v{}:", self.inner.version)?;
        }
        for (i, part) in self.inner.parts.iter().enumerate() {
            if i > 0 {
                write!(f, "&")?;
            }
            write!(f, "{}", part)?;
        }
        Ok(())
    }
}

impl CacheKey {
    /// Creates a new cache key with the given components.
    pub fn new(prefix: impl Into<SmolStr>, version: u32, parts: Vec<KeyPart>) -> Self {
        CacheKey {
            inner: Arc::new(CacheKeyInner {
                parts,
                version,
                prefix: prefix.into(),
            }),
        }
    }

    /// Creates a simple cache key with a single key-value part.
    ///
    /// The prefix is empty and version is 0.
    pub fn from_str(key: &str, value: &str) -> Self {
        Self::new(SmolStr::default(), 0, vec![KeyPart::new(key, Some(value))])
    }

    /// Returns an iterator over the key parts.
    pub fn parts(&self) -> impl Iterator<Item = &KeyPart> {
        self.inner.parts.iter()
    }

    /// Returns the cache key version number.
    pub fn version(&self) -> u32 {
        self.inner.version
    }

    /// Returns the cache key prefix.
    pub fn prefix(&self) -> &str {
        &self.inner.prefix
    }
}

/// A single component of a cache key.
///
/// The value is optional: a header extractor records the header name with no
/// value when the header is absent, so "absent" and "empty" stay distinct.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct KeyPart {
    key: SmolStr,
    value: Option<SmolStr>,
}

impl fmt::Display for KeyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key)?;
        if let Some(ref value) = self.value {
            write!(f, "={}", value)?;
        }
        Ok(())
    }
}

impl KeyPart {
    /// Creates a new key part.
    pub fn new<K: AsRef<str>, V: AsRef<str>>(key: K, value: Option<V>) -> Self {
        KeyPart {
            key: SmolStr::new(key),
            value: value.map(SmolStr::new),
        }
    }

    /// Returns the key name.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the optional value.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

/// Builder for accumulating cache key parts during extraction.
///
/// Extractors in a chain each push their parts; the storage layer finally
/// turns the accumulated parts into a [`CacheKey`] with its own prefix and
/// version.
#[derive(Debug, Default, Clone)]
pub struct KeyParts {
    parts: Vec<KeyPart>,
}

impl KeyParts {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a single key part.
    pub fn push(&mut self, part: KeyPart) {
        self.parts.push(part)
    }

    /// Appends multiple key parts from a vector.
    pub fn append(&mut self, parts: &mut Vec<KeyPart>) {
        self.parts.append(parts)
    }

    /// Returns the number of accumulated parts.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Returns `true` if no part was extracted.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Consumes the builder and returns the cache key.
    pub fn into_cache_key(self, prefix: impl Into<SmolStr>, version: u32) -> CacheKey {
        CacheKey::new(prefix, version, self.parts)
    }
}
