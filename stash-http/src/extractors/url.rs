use http::Uri;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, percent_encode};
use stash_core::{Extractor, KeyPart, KeyParts};

use super::NeutralExtractor;
use crate::RequestContext;

/// Extracts the normalized request URL as a cache key part.
///
/// See [`normalize_uri`] for the rules. Adds a key part named `"url"`.
#[derive(Debug, Clone)]
pub struct Url<E> {
    inner: E,
}

impl Url<NeutralExtractor> {
    pub fn new() -> Self {
        Self {
            inner: NeutralExtractor::new(),
        }
    }
}

impl Default for Url<NeutralExtractor> {
    fn default() -> Self {
        Self::new()
    }
}

/// Extension trait for adding URL extraction to an extractor chain.
pub trait UrlExtractor: Sized {
    /// Adds normalized URL extraction to the chain.
    fn url(self) -> Url<Self>;
}

impl<E> UrlExtractor for E
where
    E: Extractor<Subject = RequestContext>,
{
    fn url(self) -> Url<Self> {
        Url { inner: self }
    }
}

impl<E> Extractor for Url<E>
where
    E: Extractor<Subject = RequestContext>,
{
    type Subject = RequestContext;

    fn get(&self, subject: &Self::Subject) -> KeyParts {
        let mut parts = self.inner.get(subject);
        parts.push(KeyPart::new("url", Some(normalize_uri(subject.uri()))));
        parts
    }
}

/// Renders `uri` so that logically equal URLs produce the same string.
///
/// - scheme and host are lower-cased
/// - the scheme's default port (80 for http, 443 for https) is dropped
/// - an empty path becomes `/`
/// - query parameters are sorted by decoded name, keeping the relative order
///   of repeated names, and re-encoded in one canonical form; decoding is
///   byte-exact, so different escapes never produce the same string
/// - the fragment never reaches an [`http::Uri`] and so never matters
pub fn normalize_uri(uri: &Uri) -> String {
    let mut out = String::new();

    if let Some(scheme) = uri.scheme_str() {
        out.push_str(&scheme.to_ascii_lowercase());
        out.push_str("://");
    }

    if let Some(host) = uri.host() {
        out.push_str(&host.to_ascii_lowercase());
        let default_port = match uri.scheme_str().map(str::to_ascii_lowercase).as_deref() {
            Some("http") => Some(80),
            Some("https") => Some(443),
            _ => None,
        };
        if let Some(port) = uri.port_u16().filter(|port| Some(*port) != default_port) {
            out.push(':');
            out.push_str(&port.to_string());
        }
    }

    match uri.path() {
        "" => out.push('/'),
        path => out.push_str(path),
    }

    if let Some(query) = uri.query().filter(|query| !query.is_empty()) {
        out.push('?');
        out.push_str(&sort_query(query));
    }

    out
}

/// Bytes left as-is when a query component is re-encoded.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

struct QueryPair {
    name: Vec<u8>,
    value: Option<Vec<u8>>,
}

impl QueryPair {
    fn parse(segment: &str) -> Self {
        match segment.split_once('=') {
            Some((name, value)) => Self {
                name: decode_component(name),
                value: Some(decode_component(value)),
            },
            None => Self {
                name: decode_component(segment),
                value: None,
            },
        }
    }

    fn write(&self, out: &mut String) {
        out.extend(percent_encode(&self.name, QUERY_COMPONENT));
        if let Some(value) = &self.value {
            out.push('=');
            out.extend(percent_encode(value, QUERY_COMPONENT));
        }
    }
}

// Decodes to raw bytes so that distinct escapes never collapse.
fn decode_component(component: &str) -> Vec<u8> {
    let spaced = component.replace('+', " ");
    percent_decode_str(&spaced).collect()
}

fn sort_query(query: &str) -> String {
    let mut pairs: Vec<QueryPair> = query
        .split('&')
        .filter(|segment| !segment.is_empty())
        .map(QueryPair::parse)
        .collect();
    pairs.sort_by(|a, b| a.name.cmp(&b.name));

    let mut out = String::with_capacity(query.len());
    for (i, pair) in pairs.iter().enumerate() {
        if i > 0 {
            out.push('&');
        }
        pair.write(&mut out);
    }
    out
}
