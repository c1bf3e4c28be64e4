//! Traits and structs for stash backend interaction.
//!
//! If you want to implement your own storage, you are in the right place:
//! implement [`Backend`] (raw bytes in, raw bytes out) and opt into
//! [`CacheBackend`] to get the typed operations for free.
mod backend;
pub mod format;
mod key;

pub use backend::{Backend, BackendResult, CacheBackend};
pub use format::{FormatError, ValueFormat};
pub use key::CacheKeyFormat;
use thiserror::Error;

/// Proxy Error describes general groups of errors in backend interaction process.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Internal backend error, state or computation error.
    ///
    /// Any error not bounded with network interaction.
    #[error(transparent)]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
    /// Network interaction error.
    #[error(transparent)]
    ConnectionError(Box<dyn std::error::Error + Send + Sync>),
    /// Serializing\Deserializing data error.
    #[error(transparent)]
    FormatError(#[from] FormatError),
}

impl BackendError {
    /// Returns `true` if stored bytes were found but could not be decoded.
    pub fn is_corrupted(&self) -> bool {
        matches!(self, BackendError::FormatError(FormatError::Deserialize(_)))
    }
}

/// Status of deleting result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteStatus {
    /// Record successfully deleted.
    Deleted(u32),
    /// Record already missing.
    Missing,
}
