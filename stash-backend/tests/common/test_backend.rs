//! Simple in-memory test backend implementation using DashMap.

use async_trait::async_trait;
use dashmap::DashMap;
use stash_backend::{Backend, BackendError, BackendResult, CacheBackend, DeleteStatus, ValueFormat};
use stash_core::{CacheKey, Raw};
use std::sync::Arc;

/// Simple in-memory backend for testing using DashMap.
///
/// This backend is thread-safe and can be cloned cheaply (Arc internally).
#[derive(Clone)]
pub struct TestBackend {
    store: Arc<DashMap<CacheKey, Raw>>,
    format: ValueFormat,
}

impl TestBackend {
    /// Create a new empty test backend.
    pub fn new() -> Self {
        Self::with_format(ValueFormat::Json)
    }

    /// Create a backend encoding values with `format`.
    pub fn with_format(format: ValueFormat) -> Self {
        Self {
            store: Arc::new(DashMap::new()),
            format,
        }
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Put raw bytes under `key`, bypassing the value format.
    pub fn put_raw(&self, key: &CacheKey, raw: &'static [u8]) {
        self.store.insert(key.clone(), Raw::from_static(raw));
    }
}

impl Default for TestBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for TestBackend {
    async fn read(&self, key: &CacheKey) -> BackendResult<Option<Raw>> {
        Ok(self.store.get(key).map(|v| v.clone()))
    }

    async fn write(&self, key: &CacheKey, value: Raw) -> BackendResult<()> {
        self.store.insert(key.clone(), value);
        Ok(())
    }

    async fn remove(&self, key: &CacheKey) -> BackendResult<DeleteStatus> {
        let existed = self.store.remove(key).is_some();
        Ok(if existed {
            DeleteStatus::Deleted(1)
        } else {
            DeleteStatus::Missing
        })
    }

    fn value_format(&self) -> &ValueFormat {
        &self.format
    }

    fn name(&self) -> &str {
        "test"
    }
}

impl CacheBackend for TestBackend {}

/// Backend that always returns errors (for error testing).
#[derive(Clone, Default)]
pub struct ErrorBackend;

#[async_trait]
impl Backend for ErrorBackend {
    async fn read(&self, _key: &CacheKey) -> BackendResult<Option<Raw>> {
        Err(BackendError::ConnectionError(Box::new(
            std::io::Error::other("simulated error"),
        )))
    }

    async fn write(&self, _key: &CacheKey, _value: Raw) -> BackendResult<()> {
        Err(BackendError::ConnectionError(Box::new(
            std::io::Error::other("simulated error"),
        )))
    }

    async fn remove(&self, _key: &CacheKey) -> BackendResult<DeleteStatus> {
        Err(BackendError::ConnectionError(Box::new(
            std::io::Error::other("simulated error"),
        )))
    }

    fn name(&self) -> &str {
        "error"
    }
}

impl CacheBackend for ErrorBackend {}
