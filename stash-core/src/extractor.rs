//! Request fingerprinting.
//!
//! This module provides the [`Extractor`] trait for extracting data from
//! requests to build cache keys.
//!
//! Extractors pull relevant data from requests (like HTTP method, URL,
//! selected headers) and produce [`KeyParts`] that form the cache key.
//! Extractors wrap an inner extractor, so a chain is built from the inside
//! out and every link appends its own parts after the parts of its inner
//! link.
//!
//! ## Example
//!
//! ```
//! use stash_core::{Extractor, KeyPart, KeyParts};
//!
//! #[derive(Debug)]
//! struct Path;
//!
//! impl Extractor for Path {
//!     type Subject = String;
//!
//!     fn get(&self, subject: &Self::Subject) -> KeyParts {
//!         let mut parts = KeyParts::new();
//!         parts.push(KeyPart::new("path", Some(subject)));
//!         parts
//!     }
//! }
//!
//! let key = Path.get(&"/users".to_string()).into_cache_key("", 0);
//! assert_eq!(key.to_string(), "path=/users");
//! ```

use std::sync::Arc;

use crate::KeyParts;

/// Trait for extracting cache key components from a subject.
///
/// Extraction is pure and synchronous: it only reads the subject. The same
/// subject must always produce the same parts, which is what makes the
/// resulting [`CacheKey`](crate::CacheKey) usable as a fingerprint.
///
/// # Blanket Implementations
///
/// This trait is implemented for:
/// - `&T` where `T: Extractor`
/// - `Box<T>` where `T: Extractor`
/// - `Arc<T>` where `T: Extractor`
pub trait Extractor {
    /// The type from which cache key components are extracted.
    type Subject;

    /// Extract cache key components from the subject.
    fn get(&self, subject: &Self::Subject) -> KeyParts;
}

impl<T> Extractor for &T
where
    T: Extractor + ?Sized,
{
    type Subject = T::Subject;

    fn get(&self, subject: &T::Subject) -> KeyParts {
        (**self).get(subject)
    }
}

impl<T> Extractor for Box<T>
where
    T: Extractor + ?Sized,
{
    type Subject = T::Subject;

    fn get(&self, subject: &T::Subject) -> KeyParts {
        self.as_ref().get(subject)
    }
}

impl<T> Extractor for Arc<T>
where
    T: Extractor + ?Sized,
{
    type Subject = T::Subject;

    fn get(&self, subject: &T::Subject) -> KeyParts {
        self.as_ref().get(subject)
    }
}
