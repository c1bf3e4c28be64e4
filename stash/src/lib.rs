//! Request-scoped response caching for HTTP clients.
//!
//! A [`CacheInterceptor`] sits between an HTTP client and the network. Before
//! a request is sent, [`setup`](CacheInterceptor::setup) decides whether the
//! request must bypass the cache and otherwise looks the request up in the
//! [`CacheStorage`]; a hit is returned as [`Outcome::ServeCached`] and the
//! network call is skipped. After the exchange,
//! [`evaluate`](CacheInterceptor::evaluate) decides whether the response is
//! stored.
//!
//! Whether a response was replayed is recorded in the request's
//! [`RequestConfig`] under [`CACHED_RESPONSE_KEY`].
//!
//! ```
//! use http::{Method, StatusCode};
//! use stash::{CacheInterceptor, CacheStorage, Outcome};
//! use stash_http::{CachedResponse, RequestContext, ResponseContext};
//! use stash_moka::MokaBackend;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), stash::CacheError> {
//! let interceptor = CacheInterceptor::new(CacheStorage::new(
//!     MokaBackend::builder(1_000).build(),
//! ));
//!
//! let uri: http::Uri = "http://example.com/".parse().unwrap();
//! let mut request = RequestContext::new(Method::GET, uri.clone());
//! assert_eq!(interceptor.setup(&mut request).await?, Outcome::Proceed);
//!
//! let fetched = CachedResponse::new(StatusCode::OK).with_body("hello");
//! interceptor
//!     .evaluate(&ResponseContext::new(request, Some(fetched)))
//!     .await?;
//!
//! let mut again = RequestContext::new(Method::GET, uri);
//! let cached = interceptor.setup(&mut again).await?.into_cached().unwrap();
//! assert_eq!(cached.body().as_ref(), b"hello");
//! assert!(again.config().served_from_cache());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod interceptor;
pub mod predicates;
pub mod storage;

pub use config::StashConfig;
pub use error::{CacheError, CacheStorageError, ConfigError};
pub use interceptor::{CacheInterceptor, CacheInterceptorBuilder, Evaluation, NotSet};
pub use predicates::{AlwaysCache, ConfigFlag, NeverForceFresh, SuccessStatus};
pub use stash_core::{CACHED_RESPONSE_KEY, Outcome, Predicate, PredicateError, RequestConfig};
pub use storage::CacheStorage;
