//! Cache key extractors for HTTP requests.
//!
//! Extractors generate cache key parts from [`RequestContext`] components.
//! They implement the [`Extractor`] trait and are chained with the builder
//! pattern; every link appends its parts after the parts of its inner link.
//!
//! # Available Extractors
//!
//! | Extractor | Key part |
//! |-----------|----------|
//! | [`Method`] | `method=GET` |
//! | [`Url`] | `url=<normalized url>` |
//! | [`Header`] | `header:<name>=<value>`, or the bare name when absent |
//! | [`Body`] | `body=<sha256 hex>` |
//!
//! # Builder Pattern
//!
//! ```
//! use http::header::ACCEPT_LANGUAGE;
//! use stash_http::extractors::{HeaderExtractor, Method, UrlExtractor};
//!
//! let extractor = Method::new().url().header(ACCEPT_LANGUAGE);
//! ```
//!
//! [`Extractor`]: stash_core::Extractor

use stash_core::{Extractor, KeyParts};

use crate::RequestContext;

pub use body::{Body, BodyExtractor};
pub use header::{Header, HeaderExtractor};
pub use method::{Method, MethodExtractor};
pub use url::{Url, UrlExtractor, normalize_uri};

mod body;
mod header;
mod method;
mod url;

/// Fingerprint used when nothing else is configured: method plus normalized URL.
pub type DefaultFingerprint = Url<Method<NeutralExtractor>>;

/// Returns the [`DefaultFingerprint`] chain.
pub fn default_fingerprint() -> DefaultFingerprint {
    Method::new().url()
}

/// Boxed extractor over requests, used for chains assembled at runtime.
pub type BoxExtractor = Box<dyn Extractor<Subject = RequestContext> + Send + Sync>;

/// Base extractor that produces no key parts.
///
/// Start chains with [`Method::new()`] instead of using this directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeutralExtractor;

impl NeutralExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Extractor for NeutralExtractor {
    type Subject = RequestContext;

    fn get(&self, _subject: &Self::Subject) -> KeyParts {
        KeyParts::new()
    }
}
