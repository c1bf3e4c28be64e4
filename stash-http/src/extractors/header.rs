use http::HeaderName;
use stash_core::{Extractor, KeyPart, KeyParts};

use super::NeutralExtractor;
use crate::RequestContext;

/// Header extractor.
///
/// Adds a part named `header:<name>`. Multiple values are joined with `", "`
/// in the order they were sent. An absent header yields a part with no
/// value, which is distinct from a header sent with an empty value.
#[derive(Debug, Clone)]
pub struct Header<E> {
    inner: E,
    name: HeaderName,
}

impl Header<NeutralExtractor> {
    pub fn new(name: HeaderName) -> Self {
        Self {
            inner: NeutralExtractor::new(),
            name,
        }
    }
}

pub trait HeaderExtractor: Sized {
    /// Adds extraction of the header `name` to the chain.
    fn header(self, name: HeaderName) -> Header<Self>;
}

impl<E> HeaderExtractor for E
where
    E: Extractor<Subject = RequestContext>,
{
    fn header(self, name: HeaderName) -> Header<Self> {
        Header { inner: self, name }
    }
}

impl<E> Extractor for Header<E>
where
    E: Extractor<Subject = RequestContext>,
{
    type Subject = RequestContext;

    fn get(&self, subject: &Self::Subject) -> KeyParts {
        let mut parts = self.inner.get(subject);
        let mut values = subject.headers().get_all(&self.name).iter().peekable();
        let value = values.peek().is_some().then(|| {
            values
                .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
                .collect::<Vec<_>>()
                .join(", ")
        });
        parts.push(KeyPart::new(format!("header:{}", self.name), value));
        parts
    }
}
