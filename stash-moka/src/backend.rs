//! Moka backend implementation.

use async_trait::async_trait;
use moka::future::Cache;
use stash_backend::{Backend, BackendResult, CacheBackend, DeleteStatus, ValueFormat};
use stash_core::{CacheKey, Raw};

use crate::builder::MokaBackendBuilder;

/// In-memory cache backend powered by Moka.
///
/// `MokaBackend` stores complete serialized responses in Moka's async cache.
/// Moka replaces a value atomically on `insert` and shards its internal
/// locks, so readers of one key never observe a half-written value and
/// writers of different keys do not serialize on a global lock.
///
/// # Caveats
///
/// - Data is **not persisted** — cache is lost on process restart
/// - Data is **not shared** across processes — use Redis for that
/// - Capacity eviction is **best-effort** — it runs on Moka's maintenance
///   schedule, not synchronously with `write`
#[derive(Clone)]
pub struct MokaBackend {
    pub(crate) cache: Cache<CacheKey, Raw>,
    pub(crate) value_format: ValueFormat,
    pub(crate) name: String,
}

impl std::fmt::Debug for MokaBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaBackend")
            .field("name", &self.name)
            .field("entries", &self.cache.entry_count())
            .field("value_format", &self.value_format)
            .finish()
    }
}

impl MokaBackend {
    /// Creates a new builder for `MokaBackend` with the specified maximum capacity.
    ///
    /// The `max_capacity` determines the maximum number of entries the cache can hold.
    pub fn builder(max_capacity: u64) -> MokaBackendBuilder {
        MokaBackendBuilder::new(max_capacity)
    }

    /// Returns the underlying Moka cache.
    pub fn cache(&self) -> &Cache<CacheKey, Raw> {
        &self.cache
    }
}

#[async_trait]
impl Backend for MokaBackend {
    async fn read(&self, key: &CacheKey) -> BackendResult<Option<Raw>> {
        Ok(self.cache.get(key).await)
    }

    async fn write(&self, key: &CacheKey, value: Raw) -> BackendResult<()> {
        self.cache.insert(key.clone(), value).await;
        Ok(())
    }

    async fn remove(&self, key: &CacheKey) -> BackendResult<DeleteStatus> {
        match self.cache.remove(key).await {
            Some(_) => Ok(DeleteStatus::Deleted(1)),
            None => Ok(DeleteStatus::Missing),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn value_format(&self) -> &ValueFormat {
        &self.value_format
    }
}

impl CacheBackend for MokaBackend {}
