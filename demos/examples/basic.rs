//! Caching a reqwest client with stash-reqwest.
//!
//! Sends the same request five times. The first one goes to the network,
//! the other four are answered from the in-memory Moka cache.
//!
//! Run:
//!   cargo run -p stash-demos --example basic

use reqwest::Client;
use reqwest_middleware::ClientBuilder;
use stash::{CacheInterceptor, CacheStorage};
use stash_http::DEFAULT_CACHE_STATUS_HEADER;
use stash_moka::MokaBackend;
use stash_reqwest::{CacheMiddleware, ResponseCacheExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("stash=debug,stash_reqwest=debug")
        .init();

    let storage = CacheStorage::new(MokaBackend::builder(1000).build());
    let middleware = CacheMiddleware::builder()
        .interceptor(CacheInterceptor::new(storage))
        .cache_status_header(DEFAULT_CACHE_STATUS_HEADER)
        .build();

    let client = ClientBuilder::new(Client::new()).with(middleware).build();
    let url = "http://www.example.com/";

    for attempt in 1..=5 {
        let response = client.get(url).send().await?;
        println!(
            "#{attempt}: status={} x-cache-status={:?} cached={}",
            response.status(),
            response.headers().get(DEFAULT_CACHE_STATUS_HEADER),
            response.served_from_cache(),
        );
        let body = response.text().await?;
        println!("    body length: {} bytes", body.len());
    }

    Ok(())
}
