#![warn(missing_docs)]
//! HTTP model for the stash response cache.
//!
//! This crate binds the protocol-agnostic pieces of `stash-core` to HTTP:
//!
//! - [`RequestContext`] is what predicates and extractors see before the
//!   request is sent, including the per-request [`RequestConfig`](stash_core::RequestConfig)
//! - [`CachedResponse`] is the immutable snapshot that is stored and replayed
//! - [`ResponseContext`] pairs the two after the network call
//! - [`extractors`] turn a request into a [`CacheKey`](stash_core::CacheKey)
//! - [`ReplayFilter`] removes headers that must not be replayed from cache

pub mod cache_status;
pub mod extractors;
mod replay;
mod request;
mod response;

pub use cache_status::DEFAULT_CACHE_STATUS_HEADER;
pub use replay::ReplayFilter;
pub use request::RequestContext;
pub use response::{CachedResponse, ResponseContext};
