//! Named cache decision strategies.
//!
//! [`AlwaysCache`] and [`NeverForceFresh`] are the defaults of the
//! interceptor. [`ConfigFlag`] lets callers steer both decisions per request
//! through the [`RequestConfig`] slot, and [`SuccessStatus`] restricts
//! storage to `2xx` responses.

use std::marker::PhantomData;

use async_trait::async_trait;
use stash_core::{Always, Never, Predicate, PredicateError, RequestConfig};
use stash_http::{RequestContext, ResponseContext};

/// Default `can_cache` strategy: every response may be stored.
pub type AlwaysCache = Always<ResponseContext>;

/// Default `must_be_fresh` strategy: never bypass the cache.
pub type NeverForceFresh = Never<RequestContext>;

/// Subjects that carry the per-request [`RequestConfig`].
pub trait HasRequestConfig {
    fn request_config(&self) -> &RequestConfig;
}

impl HasRequestConfig for RequestContext {
    fn request_config(&self) -> &RequestConfig {
        self.config()
    }
}

impl HasRequestConfig for ResponseContext {
    fn request_config(&self) -> &RequestConfig {
        self.request().config()
    }
}

/// Reads a boolean flag from the request config, falling back to `default`
/// when the key is unset.
///
/// A value of any other JSON type is a predicate failure rather than a
/// silent default.
///
/// ```
/// use stash::predicates::ConfigFlag;
/// use stash_http::RequestContext;
///
/// let must_be_fresh = ConfigFlag::<RequestContext>::new("requestFresh", false);
/// ```
pub struct ConfigFlag<S> {
    key: String,
    default: bool,
    _subject: PhantomData<fn(S) -> S>,
}

impl<S> ConfigFlag<S> {
    pub fn new(key: impl Into<String>, default: bool) -> Self {
        Self {
            key: key.into(),
            default,
            _subject: PhantomData,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl<S> Clone for ConfigFlag<S> {
    fn clone(&self) -> Self {
        Self::new(self.key.clone(), self.default)
    }
}

impl<S> std::fmt::Debug for ConfigFlag<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigFlag")
            .field("key", &self.key)
            .field("default", &self.default)
            .finish()
    }
}

#[async_trait]
impl<S> Predicate for ConfigFlag<S>
where
    S: HasRequestConfig + Send + Sync,
{
    type Subject = S;

    async fn check(&self, subject: &Self::Subject) -> Result<bool, PredicateError> {
        match subject.request_config().get(&self.key) {
            None => Ok(self.default),
            Some(value) => value.as_bool().ok_or_else(|| {
                PredicateError::new(format!(
                    "request config {:?} must be a boolean, got {value}",
                    self.key
                ))
            }),
        }
    }
}

/// Accepts responses with a `2xx` status.
#[derive(Debug, Clone, Copy, Default)]
pub struct SuccessStatus;

#[async_trait]
impl Predicate for SuccessStatus {
    type Subject = ResponseContext;

    async fn check(&self, subject: &Self::Subject) -> Result<bool, PredicateError> {
        Ok(subject
            .response()
            .is_some_and(|response| response.status().is_success()))
    }
}
