use std::{future::Future, sync::Arc};

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use stash_core::{CacheKey, Raw};
use tracing::trace;

use crate::{BackendError, CacheKeyFormat, DeleteStatus, ValueFormat};

pub type BackendResult<T> = Result<T, BackendError>;

/// Raw key/value storage addressed by [`CacheKey`].
///
/// Implementations must make `write` an atomic replace per key: a concurrent
/// `read` of the same key observes either the previous complete value or the
/// new complete value, never a mix. Distinct keys must not block each other
/// for longer than the implementation's own bookkeeping needs.
#[async_trait]
pub trait Backend: Sync + Send {
    async fn read(&self, key: &CacheKey) -> BackendResult<Option<Raw>>;

    async fn write(&self, key: &CacheKey, value: Raw) -> BackendResult<()>;

    async fn remove(&self, key: &CacheKey) -> BackendResult<DeleteStatus>;

    /// Returns the name of this backend, used in logs and errors.
    fn name(&self) -> &str {
        "backend"
    }

    fn value_format(&self) -> &ValueFormat {
        &ValueFormat::Json
    }

    fn key_format(&self) -> &CacheKeyFormat {
        &CacheKeyFormat::Bitcode
    }
}

#[async_trait]
impl Backend for &dyn Backend {
    async fn read(&self, key: &CacheKey) -> BackendResult<Option<Raw>> {
        (*self).read(key).await
    }

    async fn write(&self, key: &CacheKey, value: Raw) -> BackendResult<()> {
        (*self).write(key, value).await
    }

    async fn remove(&self, key: &CacheKey) -> BackendResult<DeleteStatus> {
        (*self).remove(key).await
    }

    fn name(&self) -> &str {
        (*self).name()
    }

    fn value_format(&self) -> &ValueFormat {
        (*self).value_format()
    }

    fn key_format(&self) -> &CacheKeyFormat {
        (*self).key_format()
    }
}

#[async_trait]
impl Backend for Box<dyn Backend> {
    async fn read(&self, key: &CacheKey) -> BackendResult<Option<Raw>> {
        (**self).read(key).await
    }

    async fn write(&self, key: &CacheKey, value: Raw) -> BackendResult<()> {
        (**self).write(key, value).await
    }

    async fn remove(&self, key: &CacheKey) -> BackendResult<DeleteStatus> {
        (**self).remove(key).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn value_format(&self) -> &ValueFormat {
        (**self).value_format()
    }

    fn key_format(&self) -> &CacheKeyFormat {
        (**self).key_format()
    }
}

#[async_trait]
impl Backend for Arc<dyn Backend + Send + 'static> {
    async fn read(&self, key: &CacheKey) -> BackendResult<Option<Raw>> {
        (**self).read(key).await
    }

    async fn write(&self, key: &CacheKey, value: Raw) -> BackendResult<()> {
        (**self).write(key, value).await
    }

    async fn remove(&self, key: &CacheKey) -> BackendResult<DeleteStatus> {
        (**self).remove(key).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn value_format(&self) -> &ValueFormat {
        (**self).value_format()
    }

    fn key_format(&self) -> &CacheKeyFormat {
        (**self).key_format()
    }
}

/// High-level cache backend trait with typed operations.
///
/// `get`, `set` and `delete` handle serialization on top of the raw
/// [`Backend`] operations. A value is encoded completely before the single
/// `write` call, so an encoding failure never touches the stored entry.
pub trait CacheBackend: Backend {
    /// Reads and decodes the value stored under `key`.
    ///
    /// Returns `Ok(None)` on a miss. Bytes that are present but cannot be
    /// decoded yield [`BackendError::FormatError`] (see
    /// [`BackendError::is_corrupted`]), never a miss.
    fn get<T>(&self, key: &CacheKey) -> impl Future<Output = BackendResult<Option<T>>> + Send
    where
        T: DeserializeOwned + Send,
    {
        async move {
            let Some(raw) = self.read(key).await? else {
                trace!(backend = self.name(), %key, "read miss");
                return Ok(None);
            };
            trace!(backend = self.name(), %key, bytes = raw.len(), "read hit");
            let value = self.value_format().deserialize(&raw)?;
            Ok(Some(value))
        }
    }

    /// Encodes `value` and stores it under `key`, replacing any previous value.
    fn set<T>(&self, key: &CacheKey, value: &T) -> impl Future<Output = BackendResult<()>> + Send
    where
        T: Serialize + Sync + ?Sized,
    {
        async move {
            let raw = self.value_format().serialize(value)?;
            trace!(backend = self.name(), %key, bytes = raw.len(), "write");
            self.write(key, raw).await
        }
    }

    /// Removes the value stored under `key`.
    fn delete(&self, key: &CacheKey) -> impl Future<Output = BackendResult<DeleteStatus>> + Send {
        async move {
            let status = self.remove(key).await?;
            trace!(backend = self.name(), %key, ?status, "remove");
            Ok(status)
        }
    }
}

// Explicit CacheBackend implementations for trait objects
// These use the default implementations from the trait
impl CacheBackend for &dyn Backend {}

impl CacheBackend for Box<dyn Backend> {}

impl CacheBackend for Arc<dyn Backend + Send + 'static> {}
