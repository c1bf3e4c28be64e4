//! Error types for Redis backend operations.
//!
//! All errors convert to [`BackendError`] so the cache layer handles them
//! the same way as errors from any other backend.
//!
//! [`BackendError`]: stash_backend::BackendError

use redis::RedisError;
use stash_backend::BackendError;

/// Error type for Redis backend operations.
///
/// # When You'll Encounter This
///
/// - Using [`RedisBackendBuilder::build`] with an invalid connection URL
/// - Performing the first cache operation when Redis is unreachable
///   (connection is established lazily)
/// - Performing cache operations when the Redis server returns an error
///
/// [`RedisBackendBuilder::build`]: crate::RedisBackendBuilder::build
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An error from the underlying Redis client.
    #[error("Redis backend error: {0}")]
    Redis(#[from] RedisError),
}

impl Error {
    fn is_connection(&self) -> bool {
        match self {
            Error::Redis(err) => {
                err.is_io_error()
                    || err.is_connection_dropped()
                    || err.is_connection_refusal()
                    || err.is_timeout()
            }
        }
    }
}

impl From<Error> for BackendError {
    fn from(error: Error) -> Self {
        if error.is_connection() {
            Self::ConnectionError(Box::new(error))
        } else {
            Self::InternalError(Box::new(error))
        }
    }
}
