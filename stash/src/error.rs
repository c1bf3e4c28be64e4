//! Error types of the cache subsystem.
//!
//! A cache miss is never an error. Everything below is a real failure that
//! aborts the request it happened in and is returned to the caller as is;
//! nothing is retried.

use stash_backend::BackendError;
use stash_core::{CacheKey, PredicateError};
use thiserror::Error;

/// Failure of a [`CacheStorage`](crate::CacheStorage) operation.
#[derive(Debug, Error)]
pub enum CacheStorageError {
    /// The backend could not be reached or refused the operation, or a
    /// response could not be serialized for storage.
    #[error("cache backend error: {0}")]
    Backend(#[from] BackendError),

    /// An entry exists under `key` but cannot be decoded into a response.
    #[error("cached entry {key} is corrupted")]
    Corrupted {
        key: CacheKey,
        #[source]
        source: BackendError,
    },
}

/// Error returned by [`CacheInterceptor::setup`] and
/// [`CacheInterceptor::evaluate`].
///
/// [`CacheInterceptor::setup`]: crate::CacheInterceptor::setup
/// [`CacheInterceptor::evaluate`]: crate::CacheInterceptor::evaluate
#[derive(Debug, Error)]
pub enum CacheError {
    #[error(transparent)]
    Storage(#[from] CacheStorageError),

    /// A `can_cache` or `must_be_fresh` predicate failed.
    #[error(transparent)]
    Predicate(#[from] PredicateError),
}

/// Invalid [`StashConfig`](crate::config::StashConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid yaml configuration: {0}")]
    Yaml(String),

    #[error("invalid header name {name:?}")]
    InvalidHeader {
        name: String,
        #[source]
        source: http::header::InvalidHeaderName,
    },

    #[error("backend {0} is not available")]
    BackendNotAvailable(String),
}
