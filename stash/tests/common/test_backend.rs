//! In-memory test backends using DashMap.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use stash_backend::{Backend, BackendError, BackendResult, CacheBackend, DeleteStatus};
use stash_core::{CacheKey, Raw};

/// In-memory backend that also counts operations.
///
/// Clones share the same map and counters.
#[derive(Clone, Default)]
pub struct TestBackend {
    store: Arc<DashMap<CacheKey, Raw>>,
    reads: Arc<AtomicUsize>,
    writes: Arc<AtomicUsize>,
    removes: Arc<AtomicUsize>,
}

impl TestBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn removes(&self) -> usize {
        self.removes.load(Ordering::SeqCst)
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Put raw bytes under `key`, bypassing the value format.
    pub fn put_raw(&self, key: &CacheKey, raw: &'static [u8]) {
        self.store.insert(key.clone(), Raw::from_static(raw));
    }
}

#[async_trait]
impl Backend for TestBackend {
    async fn read(&self, key: &CacheKey) -> BackendResult<Option<Raw>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.store.get(key).map(|v| v.clone()))
    }

    async fn write(&self, key: &CacheKey, value: Raw) -> BackendResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.store.insert(key.clone(), value);
        Ok(())
    }

    async fn remove(&self, key: &CacheKey) -> BackendResult<DeleteStatus> {
        self.removes.fetch_add(1, Ordering::SeqCst);
        Ok(match self.store.remove(key) {
            Some(_) => DeleteStatus::Deleted(1),
            None => DeleteStatus::Missing,
        })
    }

    fn name(&self) -> &str {
        "test"
    }
}

impl CacheBackend for TestBackend {}

/// Backend that always returns errors (for error testing).
#[derive(Clone, Default)]
pub struct ErrorBackend;

fn simulated() -> BackendError {
    BackendError::ConnectionError(Box::new(std::io::Error::other("simulated error")))
}

#[async_trait]
impl Backend for ErrorBackend {
    async fn read(&self, _key: &CacheKey) -> BackendResult<Option<Raw>> {
        Err(simulated())
    }

    async fn write(&self, _key: &CacheKey, _value: Raw) -> BackendResult<()> {
        Err(simulated())
    }

    async fn remove(&self, _key: &CacheKey) -> BackendResult<DeleteStatus> {
        Err(simulated())
    }

    fn name(&self) -> &str {
        "error"
    }
}

impl CacheBackend for ErrorBackend {}
