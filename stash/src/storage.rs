//! Fingerprint-addressed storage of response snapshots.

use std::sync::Arc;

use stash_backend::{CacheBackend, DeleteStatus};
use stash_core::{CacheKey, Extractor};
use stash_http::extractors::{DefaultFingerprint, default_fingerprint};
use stash_http::{CachedResponse, RequestContext};
use tracing::{debug, trace, warn};

use crate::error::CacheStorageError;

/// Flat key/value store of [`CachedResponse`] snapshots keyed by request
/// fingerprint.
///
/// The fingerprint comes from the extractor `E` plus an optional key prefix
/// and version. The storage owns serialized copies: a stored response is
/// never affected by later changes to the value the caller still holds, and
/// every fetch returns a fresh copy.
///
/// Cloning is cheap and shares the backend.
#[derive(Debug)]
pub struct CacheStorage<B, E = DefaultFingerprint> {
    backend: Arc<B>,
    extractor: E,
    prefix: String,
    version: u32,
}

impl<B, E: Clone> Clone for CacheStorage<B, E> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            extractor: self.extractor.clone(),
            prefix: self.prefix.clone(),
            version: self.version,
        }
    }
}

impl<B> CacheStorage<B, DefaultFingerprint> {
    /// Storage over `backend` using the method + normalized URL fingerprint.
    pub fn new(backend: B) -> Self {
        Self::from_shared(Arc::new(backend))
    }

    /// Like [`new`](Self::new), for a backend that is already shared.
    pub fn from_shared(backend: Arc<B>) -> Self {
        Self {
            backend,
            extractor: default_fingerprint(),
            prefix: String::new(),
            version: 0,
        }
    }
}

impl<B, E> CacheStorage<B, E> {
    /// Replaces the fingerprint extractor.
    pub fn with_extractor<NewE>(self, extractor: NewE) -> CacheStorage<B, NewE> {
        CacheStorage {
            backend: self.backend,
            extractor,
            prefix: self.prefix,
            version: self.version,
        }
    }

    /// Namespaces every key with `prefix`.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Sets the key version. Bumping it orphans every entry written under the
    /// previous version.
    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B, E> CacheStorage<B, E>
where
    B: CacheBackend,
    E: Extractor<Subject = RequestContext>,
{
    /// Computes the cache key of `request`.
    pub fn fingerprint(&self, request: &RequestContext) -> CacheKey {
        self.extractor
            .get(request)
            .into_cache_key(self.prefix.as_str(), self.version)
    }

    /// Looks up the response stored for `request`.
    ///
    /// Returns `Ok(None)` on a miss. A stored value that cannot be decoded is
    /// reported as [`CacheStorageError::Corrupted`].
    #[tracing::instrument(name = "storage.fetch", level = "trace", skip_all, fields(backend = self.backend.name()))]
    pub async fn fetch(
        &self,
        request: &RequestContext,
    ) -> Result<Option<CachedResponse>, CacheStorageError> {
        let key = self.fingerprint(request);
        match self.backend.get::<CachedResponse>(&key).await {
            Ok(Some(response)) => {
                trace!(%key, status = %response.status(), "hit");
                Ok(Some(response))
            }
            Ok(None) => {
                trace!(%key, "miss");
                Ok(None)
            }
            Err(source) if source.is_corrupted() => {
                warn!(%key, error = %source, "corrupted cache entry");
                Err(CacheStorageError::Corrupted { key, source })
            }
            Err(source) => Err(source.into()),
        }
    }

    /// Stores `response` for `request`, replacing any previous entry.
    ///
    /// The snapshot is serialized before the backend is touched and written
    /// with a single call, so concurrent readers see either the previous or
    /// the new complete entry. Storing twice leaves the latest response.
    #[tracing::instrument(name = "storage.store", level = "trace", skip_all, fields(backend = self.backend.name()))]
    pub async fn store(
        &self,
        request: &RequestContext,
        response: &CachedResponse,
    ) -> Result<(), CacheStorageError> {
        let key = self.fingerprint(request);
        self.backend.set(&key, response).await?;
        debug!(%key, status = %response.status(), "stored");
        Ok(())
    }

    /// Removes the entry for `request`. A missing entry is not an error.
    #[tracing::instrument(name = "storage.delete", level = "trace", skip_all, fields(backend = self.backend.name()))]
    pub async fn delete(&self, request: &RequestContext) -> Result<DeleteStatus, CacheStorageError> {
        let key = self.fingerprint(request);
        let status = self.backend.delete(&key).await?;
        debug!(%key, ?status, "deleted");
        Ok(status)
    }

    /// Returns `true` if an entry exists for `request`, without decoding it.
    pub async fn contains(&self, request: &RequestContext) -> Result<bool, CacheStorageError> {
        let key = self.fingerprint(request);
        Ok(self.backend.read(&key).await?.is_some())
    }
}
