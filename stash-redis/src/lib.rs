//! Redis backend for stash.
//!
//! Entries are stored as plain Redis strings under the serialized
//! [`CacheKey`](stash_core::CacheKey), so every write is a single `SET` and
//! replaces the previous value atomically.
#![warn(missing_docs)]

pub mod backend;
pub mod error;

#[doc(inline)]
pub use crate::backend::{RedisBackend, RedisBackendBuilder};
#[doc(inline)]
pub use crate::error::Error;
