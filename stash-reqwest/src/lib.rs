//! Stash response caching for [`reqwest`] through [`reqwest_middleware`].
//!
//! ```no_run
//! use reqwest_middleware::ClientBuilder;
//! use stash::{CacheInterceptor, CacheStorage, RequestConfig};
//! use stash_moka::MokaBackend;
//! use stash_reqwest::{CacheMiddleware, ResponseCacheExt};
//!
//! # async fn run() -> reqwest_middleware::Result<()> {
//! let interceptor = CacheInterceptor::new(CacheStorage::new(
//!     MokaBackend::builder(1_000).build(),
//! ));
//! let client = ClientBuilder::new(reqwest::Client::new())
//!     .with(CacheMiddleware::new(interceptor))
//!     .build();
//!
//! let response = client
//!     .get("http://www.example.com/")
//!     .with_extension(RequestConfig::new().with("requestFresh", false))
//!     .send()
//!     .await?;
//! println!("served from cache: {}", response.served_from_cache());
//! # Ok(())
//! # }
//! ```

mod convert;
mod middleware;

pub use middleware::{CacheMiddleware, CacheMiddlewareBuilder, ResponseCacheExt};
pub use stash::NotSet;
pub use stash_http::DEFAULT_CACHE_STATUS_HEADER;
