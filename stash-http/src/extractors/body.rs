use sha2::{Digest, Sha256};
use stash_core::{Extractor, KeyPart, KeyParts};

use super::NeutralExtractor;
use crate::RequestContext;

/// Hashes the buffered request body into a cache key part.
///
/// Adds `body=<hex sha256>`. A request without a body hashes like an empty
/// body, so `POST` with no payload and `POST` with `""` share a key.
#[derive(Debug, Clone)]
pub struct Body<E> {
    inner: E,
}

impl Body<NeutralExtractor> {
    pub fn new() -> Self {
        Self {
            inner: NeutralExtractor::new(),
        }
    }
}

impl Default for Body<NeutralExtractor> {
    fn default() -> Self {
        Self::new()
    }
}

pub trait BodyExtractor: Sized {
    /// Adds body hashing to the chain.
    fn body(self) -> Body<Self>;
}

impl<E> BodyExtractor for E
where
    E: Extractor<Subject = RequestContext>,
{
    fn body(self) -> Body<Self> {
        Body { inner: self }
    }
}

impl<E> Extractor for Body<E>
where
    E: Extractor<Subject = RequestContext>,
{
    type Subject = RequestContext;

    fn get(&self, subject: &Self::Subject) -> KeyParts {
        let mut parts = self.inner.get(subject);
        let digest = Sha256::digest(subject.body().map(|body| &body[..]).unwrap_or_default());
        parts.push(KeyPart::new("body", Some(hex::encode(digest))));
        parts
    }
}
