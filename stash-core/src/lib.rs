#![warn(missing_docs)]
//! # stash-core
//!
//! Core traits and types for the stash response cache interceptor.
//!
//! This crate is **protocol-agnostic**. It defines the pieces the interceptor
//! is assembled from, while `stash-http` binds them to HTTP requests and
//! responses and `stash-backend` provides the storage abstraction.
//!
//! - **Decide** whether to consult or populate the cache ([`Predicate`])
//! - **Fingerprint** requests into cache keys ([`Extractor`], [`CacheKey`])
//! - **Record** per-request metadata ([`RequestConfig`])
//! - **Report** the pre-send decision to the host client ([`Outcome`])

pub mod config;
pub mod context;
pub mod extractor;
pub mod key;
pub mod outcome;
pub mod predicate;

pub use config::{CACHED_RESPONSE_KEY, RequestConfig};
pub use context::CacheStatus;
pub use extractor::Extractor;
pub use key::{CacheKey, KeyPart, KeyParts};
pub use outcome::Outcome;
pub use predicate::{
    Always, And, Never, Not, Or, Predicate, PredicateError, PredicateExt, from_fn, try_from_fn,
};
#[doc(hidden)]
pub use smol_str::SmolStr;

/// Raw byte data type used for serialized cache values.
/// Using `Bytes` provides efficient zero-copy cloning via reference counting.
pub type Raw = bytes::Bytes;
