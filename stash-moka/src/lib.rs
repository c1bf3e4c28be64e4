//! In-memory backend for stash built on [Moka](https://docs.rs/moka).
//!
//! ```
//! use stash_moka::MokaBackend;
//!
//! let backend = MokaBackend::builder(10_000).build();
//! ```
#![warn(missing_docs)]

mod backend;
mod builder;

pub use backend::MokaBackend;
pub use builder::MokaBackendBuilder;
pub use moka::policy::EvictionPolicy;
