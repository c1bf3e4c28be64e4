//! The pre-send / post-send cache hooks.
//!
//! Per request the interceptor moves through these states:
//!
//! ```text
//! INIT --must_be_fresh--> FRESH_FORCED ---------------> NETWORK_SENT
//!   \                                                       |
//!    `--------------> CACHE_CHECKED --miss--> NETWORK_SENT  |
//!                          |                                v
//!                          `--hit--> CACHE_SERVED   STORE_ELIGIBLE_EVALUATED --> DONE
//! ```
//!
//! The host client drives it: it calls [`CacheInterceptor::setup`] before
//! sending, skips the transport on [`Outcome::ServeCached`], and calls
//! [`CacheInterceptor::evaluate`] once the exchange completed.

use stash_backend::CacheBackend;
use stash_core::{Extractor, Outcome, Predicate};
use stash_http::{CachedResponse, ReplayFilter, RequestContext, ResponseContext};
use tracing::debug;

use crate::error::CacheError;
use crate::predicates::{AlwaysCache, NeverForceFresh};
use crate::storage::CacheStorage;

/// What [`CacheInterceptor::evaluate`] did with a completed exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluation {
    /// The transport failed; nothing to store.
    NoResponse,
    /// The response was itself served from the cache.
    Replayed,
    /// `can_cache` declined the response.
    Rejected,
    /// An entry already exists for the fingerprint and was left untouched.
    AlreadyCached,
    /// The response was stored.
    Stored,
}

impl Evaluation {
    pub fn is_stored(&self) -> bool {
        matches!(self, Evaluation::Stored)
    }
}

/// Request-scoped response cache.
///
/// Holds the [`CacheStorage`] it reads and writes, the `can_cache`
/// predicate over completed exchanges, the `must_be_fresh` predicate over
/// outgoing requests and the [`ReplayFilter`] applied to cache hits.
///
/// # Example
///
/// ```
/// use stash::{CacheInterceptor, CacheStorage};
/// use stash_moka::MokaBackend;
///
/// let interceptor = CacheInterceptor::builder()
///     .storage(CacheStorage::new(MokaBackend::builder(1_000).build()))
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct CacheInterceptor<B, E, C = AlwaysCache, F = NeverForceFresh> {
    storage: CacheStorage<B, E>,
    can_cache: C,
    must_be_fresh: F,
    replay_filter: ReplayFilter,
}

/// Marker type for unset builder fields.
///
/// When you see `NotSet` in a compiler error, it means you haven't called
/// [`CacheInterceptorBuilder::storage`] yet.
#[derive(Debug, Clone, Copy)]
pub struct NotSet;

impl CacheInterceptor<NotSet, NotSet> {
    /// Creates a new [`CacheInterceptorBuilder`].
    pub fn builder() -> CacheInterceptorBuilder<NotSet, AlwaysCache, NeverForceFresh> {
        CacheInterceptorBuilder::new()
    }
}

impl<B, E> CacheInterceptor<B, E> {
    /// Interceptor over `storage` with the default strategies.
    pub fn new(storage: CacheStorage<B, E>) -> Self {
        Self {
            storage,
            can_cache: AlwaysCache::new(),
            must_be_fresh: NeverForceFresh::new(),
            replay_filter: ReplayFilter::default(),
        }
    }
}

impl<B, E, C, F> CacheInterceptor<B, E, C, F> {
    pub fn storage(&self) -> &CacheStorage<B, E> {
        &self.storage
    }

    pub fn replay_filter(&self) -> &ReplayFilter {
        &self.replay_filter
    }
}

impl<B, E, C, F> CacheInterceptor<B, E, C, F>
where
    B: CacheBackend,
    E: Extractor<Subject = RequestContext>,
    C: Predicate<Subject = ResponseContext> + Send + Sync,
    F: Predicate<Subject = RequestContext> + Send + Sync,
{
    /// Pre-send hook.
    ///
    /// Any served-from-cache mark already present in the request config is
    /// cleared first, so a config reused from an earlier hit starts clean.
    ///
    /// If `must_be_fresh` holds, the stored entry is deleted and the request
    /// proceeds to the network. Otherwise the storage is consulted: on a hit
    /// the unsafe-to-replay headers are removed from the copy, the request
    /// config is marked with [`CACHED_RESPONSE_KEY`](stash_core::CACHED_RESPONSE_KEY)
    /// and the copy is returned for the host to serve; on a miss the request
    /// proceeds. Method, URI, headers and body are never touched.
    #[tracing::instrument(
        name = "cache.setup",
        skip_all,
        fields(method = %request.method(), uri = %request.uri())
    )]
    pub async fn setup(
        &self,
        request: &mut RequestContext,
    ) -> Result<Outcome<CachedResponse>, CacheError> {
        // The flag describes this exchange only.
        request.config_mut().clear_served_from_cache();

        if self.must_be_fresh.check(request).await? {
            let status = self.storage.delete(request).await?;
            debug!(state = "FRESH_FORCED", ?status, "bypassing cache");
            return Ok(Outcome::Proceed);
        }

        let Some(mut response) = self.storage.fetch(request).await? else {
            debug!(state = "CACHE_CHECKED", "miss");
            return Ok(Outcome::Proceed);
        };

        let scrubbed = self.replay_filter.apply(&mut response);
        request.config_mut().mark_served_from_cache();
        debug!(
            state = "CACHE_SERVED",
            status = %response.status(),
            scrubbed,
            "hit"
        );
        Ok(Outcome::ServeCached(response))
    }

    /// Post-send hook.
    ///
    /// Stores the response when there is one, it did not come from the
    /// cache, `can_cache` accepts it and no entry exists yet. The response
    /// is stored as received, including headers a cache hit would strip.
    #[tracing::instrument(
        name = "cache.evaluate",
        skip_all,
        fields(method = %context.request().method(), uri = %context.request().uri())
    )]
    pub async fn evaluate(&self, context: &ResponseContext) -> Result<Evaluation, CacheError> {
        let Some(response) = context.response() else {
            debug!(state = "DONE", "no response to evaluate");
            return Ok(Evaluation::NoResponse);
        };

        if context.request().config().served_from_cache() {
            debug!(state = "DONE", "response replayed from cache");
            return Ok(Evaluation::Replayed);
        }

        let evaluation = if !self.can_cache.check(context).await? {
            Evaluation::Rejected
        } else if self.storage.contains(context.request()).await? {
            Evaluation::AlreadyCached
        } else {
            self.storage.store(context.request(), response).await?;
            Evaluation::Stored
        };
        debug!(state = "STORE_ELIGIBLE_EVALUATED", ?evaluation);
        Ok(evaluation)
    }
}

/// Builder for [`CacheInterceptor`].
///
/// Use [`CacheInterceptor::builder()`] to create a new builder.
pub struct CacheInterceptorBuilder<S, C, F> {
    storage: S,
    can_cache: C,
    must_be_fresh: F,
    replay_filter: ReplayFilter,
}

impl CacheInterceptorBuilder<NotSet, AlwaysCache, NeverForceFresh> {
    /// Creates a builder with the default strategies and no storage.
    pub fn new() -> Self {
        Self {
            storage: NotSet,
            can_cache: AlwaysCache::new(),
            must_be_fresh: NeverForceFresh::new(),
            replay_filter: ReplayFilter::default(),
        }
    }
}

impl Default for CacheInterceptorBuilder<NotSet, AlwaysCache, NeverForceFresh> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, C, F> CacheInterceptorBuilder<S, C, F> {
    /// Sets the storage the interceptor reads and writes.
    pub fn storage<B, E>(self, storage: CacheStorage<B, E>) -> CacheInterceptorBuilder<CacheStorage<B, E>, C, F> {
        CacheInterceptorBuilder {
            storage,
            can_cache: self.can_cache,
            must_be_fresh: self.must_be_fresh,
            replay_filter: self.replay_filter,
        }
    }

    /// Sets the predicate deciding whether a completed exchange may be stored.
    pub fn can_cache<NewC>(self, predicate: NewC) -> CacheInterceptorBuilder<S, NewC, F>
    where
        NewC: Predicate<Subject = ResponseContext>,
    {
        CacheInterceptorBuilder {
            storage: self.storage,
            can_cache: predicate,
            must_be_fresh: self.must_be_fresh,
            replay_filter: self.replay_filter,
        }
    }

    /// Sets the predicate deciding whether a request must bypass the cache.
    pub fn must_be_fresh<NewF>(self, predicate: NewF) -> CacheInterceptorBuilder<S, C, NewF>
    where
        NewF: Predicate<Subject = RequestContext>,
    {
        CacheInterceptorBuilder {
            storage: self.storage,
            can_cache: self.can_cache,
            must_be_fresh: predicate,
            replay_filter: self.replay_filter,
        }
    }

    /// Sets the headers removed from responses served from the cache.
    pub fn replay_filter(self, replay_filter: ReplayFilter) -> Self {
        Self {
            replay_filter,
            ..self
        }
    }
}

impl<B, E, C, F> CacheInterceptorBuilder<CacheStorage<B, E>, C, F> {
    /// Builds the [`CacheInterceptor`].
    pub fn build(self) -> CacheInterceptor<B, E, C, F> {
        CacheInterceptor {
            storage: self.storage,
            can_cache: self.can_cache,
            must_be_fresh: self.must_be_fresh,
            replay_filter: self.replay_filter,
        }
    }
}
