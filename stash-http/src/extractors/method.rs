use stash_core::{Extractor, KeyPart, KeyParts};

use super::NeutralExtractor;
use crate::RequestContext;

/// Extracts the HTTP method as a cache key part.
///
/// Adds a key part with name `"method"` and the method as value (e.g.,
/// `"GET"`, `"POST"`). Use this as the starting point for extractor chains.
#[derive(Debug, Clone)]
pub struct Method<E> {
    inner: E,
}

impl Method<NeutralExtractor> {
    /// Creates a method extractor as the starting point for cache key generation.
    pub fn new() -> Self {
        Self {
            inner: NeutralExtractor::new(),
        }
    }
}

impl Default for Method<NeutralExtractor> {
    fn default() -> Self {
        Self::new()
    }
}

/// Extension trait for adding method extraction to an extractor chain.
///
/// Implemented for every extractor over [`RequestContext`].
pub trait MethodExtractor: Sized {
    /// Adds HTTP method extraction to the chain.
    fn method(self) -> Method<Self>;
}

impl<E> MethodExtractor for E
where
    E: Extractor<Subject = RequestContext>,
{
    fn method(self) -> Method<Self> {
        Method { inner: self }
    }
}

impl<E> Extractor for Method<E>
where
    E: Extractor<Subject = RequestContext>,
{
    type Subject = RequestContext;

    fn get(&self, subject: &Self::Subject) -> KeyParts {
        let mut parts = self.inner.get(subject);
        parts.push(KeyPart::new("method", Some(subject.method().as_str())));
        parts
    }
}
