//! Cache middleware for reqwest-middleware.

use std::sync::Arc;

use async_trait::async_trait;
use http::{Extensions, HeaderName};
use reqwest::{Request, Response};
use reqwest_middleware::{Error, Middleware, Next, Result};
use stash::{AlwaysCache, CacheInterceptor, Evaluation, NeverForceFresh, NotSet, Outcome};
use stash_backend::CacheBackend;
use stash_core::{CacheStatus, Extractor, Predicate, RequestConfig};
use stash_http::cache_status::set_cache_status;
use stash_http::{RequestContext, ResponseContext};
use tracing::debug;

use crate::convert::{buffer_response, into_reqwest, request_context};

/// Cache middleware for reqwest-middleware.
///
/// Runs [`CacheInterceptor::setup`] before the request leaves and
/// [`CacheInterceptor::evaluate`] after the response arrived. A cache hit is
/// answered without calling the rest of the chain.
///
/// The per-request [`RequestConfig`] is taken from the middleware extensions
/// (attach it with `RequestBuilder::with_extension`). After the call the
/// updated config, including the served-from-cache flag, is written back to
/// the extensions and to the response; see [`ResponseCacheExt`].
///
/// # Type Parameters
///
/// * `B` - Cache backend (e.g., MokaBackend, RedisBackend)
/// * `E` - Fingerprint extractor
/// * `C`, `F` - `can_cache` and `must_be_fresh` predicates
pub struct CacheMiddleware<B, E, C = AlwaysCache, F = NeverForceFresh> {
    interceptor: Arc<CacheInterceptor<B, E, C, F>>,
    cache_status_header: Option<HeaderName>,
}

impl<B, E, C, F> CacheMiddleware<B, E, C, F> {
    /// Create a new cache middleware without a cache status header.
    pub fn new(interceptor: CacheInterceptor<B, E, C, F>) -> Self {
        Self::from_shared(Arc::new(interceptor))
    }

    /// Like [`new`](Self::new), sharing an interceptor with other clients.
    pub fn from_shared(interceptor: Arc<CacheInterceptor<B, E, C, F>>) -> Self {
        Self {
            interceptor,
            cache_status_header: None,
        }
    }

    pub fn interceptor(&self) -> &CacheInterceptor<B, E, C, F> {
        &self.interceptor
    }
}

impl CacheMiddleware<NotSet, NotSet> {
    /// Creates a new [`CacheMiddlewareBuilder`].
    pub fn builder() -> CacheMiddlewareBuilder<NotSet> {
        CacheMiddlewareBuilder {
            interceptor: NotSet,
            cache_status_header: None,
        }
    }
}

impl<B, E, C, F> Clone for CacheMiddleware<B, E, C, F> {
    fn clone(&self) -> Self {
        Self {
            interceptor: Arc::clone(&self.interceptor),
            cache_status_header: self.cache_status_header.clone(),
        }
    }
}

/// Builder for [`CacheMiddleware`].
pub struct CacheMiddlewareBuilder<I> {
    interceptor: I,
    cache_status_header: Option<HeaderName>,
}

impl<I> CacheMiddlewareBuilder<I> {
    /// Sets the interceptor.
    pub fn interceptor<B, E, C, F>(
        self,
        interceptor: CacheInterceptor<B, E, C, F>,
    ) -> CacheMiddlewareBuilder<Arc<CacheInterceptor<B, E, C, F>>> {
        self.shared_interceptor(Arc::new(interceptor))
    }

    /// Sets an interceptor shared with other clients.
    pub fn shared_interceptor<B, E, C, F>(
        self,
        interceptor: Arc<CacheInterceptor<B, E, C, F>>,
    ) -> CacheMiddlewareBuilder<Arc<CacheInterceptor<B, E, C, F>>> {
        CacheMiddlewareBuilder {
            interceptor,
            cache_status_header: self.cache_status_header,
        }
    }

    /// Adds a header reporting `HIT`, `MISS` or `BYPASS` to every response.
    ///
    /// `BYPASS` marks responses that were fetched and not stored because
    /// `can_cache` declined them.
    pub fn cache_status_header(mut self, name: HeaderName) -> Self {
        self.cache_status_header = Some(name);
        self
    }
}

impl<B, E, C, F> CacheMiddlewareBuilder<Arc<CacheInterceptor<B, E, C, F>>> {
    pub fn build(self) -> CacheMiddleware<B, E, C, F> {
        CacheMiddleware {
            interceptor: self.interceptor,
            cache_status_header: self.cache_status_header,
        }
    }
}

impl<B, E, C, F> CacheMiddleware<B, E, C, F> {
    fn respond(&self, mut response: Response, status: CacheStatus) -> Response {
        if let Some(name) = &self.cache_status_header {
            set_cache_status(response.headers_mut(), status, name);
        }
        response
    }
}

#[async_trait]
impl<B, E, C, F> Middleware for CacheMiddleware<B, E, C, F>
where
    B: CacheBackend + 'static,
    E: Extractor<Subject = RequestContext> + Send + Sync + 'static,
    C: Predicate<Subject = ResponseContext> + Send + Sync + 'static,
    F: Predicate<Subject = RequestContext> + Send + Sync + 'static,
{
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> Result<Response> {
        let config = extensions
            .get::<RequestConfig>()
            .cloned()
            .unwrap_or_default();
        let mut request = request_context(&req, config)?;

        let outcome = self
            .interceptor
            .setup(&mut request)
            .await
            .map_err(Error::middleware)?;

        if let Outcome::ServeCached(cached) = outcome {
            let config = request.into_config();
            extensions.insert(config.clone());
            return Ok(self.respond(into_reqwest(cached, config), CacheStatus::Hit));
        }

        let response = match next.run(req, extensions).await {
            Ok(response) => response,
            Err(error) => {
                let context = ResponseContext::new(request, None);
                self.interceptor
                    .evaluate(&context)
                    .await
                    .map_err(Error::middleware)?;
                let (request, _) = context.into_parts();
                extensions.insert(request.into_config());
                return Err(error);
            }
        };

        let snapshot = buffer_response(response).await?;
        let context = ResponseContext::new(request, Some(snapshot.clone()));
        let evaluation = self
            .interceptor
            .evaluate(&context)
            .await
            .map_err(Error::middleware)?;
        debug!(?evaluation, "network response evaluated");

        let (request, _) = context.into_parts();
        let config = request.into_config();
        extensions.insert(config.clone());

        let status = match evaluation {
            Evaluation::Rejected => CacheStatus::Bypass,
            _ => CacheStatus::Miss,
        };
        Ok(self.respond(into_reqwest(snapshot, config), status))
    }
}

/// Reads the cache outcome recorded on a response by [`CacheMiddleware`].
pub trait ResponseCacheExt {
    /// The request config as it was when the response was produced.
    fn request_config(&self) -> Option<&RequestConfig>;

    /// `true` if the response was replayed from the cache.
    fn served_from_cache(&self) -> bool {
        self.request_config()
            .is_some_and(RequestConfig::served_from_cache)
    }
}

impl ResponseCacheExt for Response {
    fn request_config(&self) -> Option<&RequestConfig> {
        self.extensions().get::<RequestConfig>()
    }
}
