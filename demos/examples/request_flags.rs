//! Steering the cache per request.
//!
//! Both decisions read flags from the request config:
//! - `requestFresh: true` drops the stored entry and goes to the network
//! - `canCacheRequest: false` keeps the response out of the cache
//!
//! The five requests below print `cached` as false, true, false, false, true.
//!
//! Run:
//!   cargo run -p stash-demos --example request_flags

use reqwest::Client;
use reqwest_middleware::ClientBuilder;
use stash::{CacheInterceptor, CacheStorage, ConfigFlag, RequestConfig};
use stash_http::{RequestContext, ResponseContext};
use stash_moka::MokaBackend;
use stash_reqwest::{CacheMiddleware, ResponseCacheExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("stash=debug")
        .init();

    let interceptor = CacheInterceptor::builder()
        .storage(CacheStorage::new(MokaBackend::builder(1000).build()))
        .must_be_fresh(ConfigFlag::<RequestContext>::new("requestFresh", false))
        .can_cache(ConfigFlag::<ResponseContext>::new("canCacheRequest", true))
        .build();

    let client = ClientBuilder::new(Client::new())
        .with(CacheMiddleware::new(interceptor))
        .build();
    let url = "http://www.example.com/";

    let requests = [
        ("plain", RequestConfig::new()),
        ("plain", RequestConfig::new()),
        (
            "fresh, not cacheable",
            RequestConfig::new()
                .with("requestFresh", true)
                .with("canCacheRequest", false),
        ),
        ("plain", RequestConfig::new()),
        ("plain", RequestConfig::new()),
    ];

    for (label, config) in requests {
        let response = client.get(url).with_extension(config).send().await?;
        println!(
            "{label:<22} status={} cached={}",
            response.status(),
            response.served_from_cache()
        );
    }

    Ok(())
}
