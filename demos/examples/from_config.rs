//! Building the cache from a YAML document.
//!
//! The fingerprint includes the `Accept-Language` header, so the two
//! languages below get separate entries.
//!
//! Run:
//!   cargo run -p stash-demos --example from_config

use reqwest::Client;
use reqwest_middleware::ClientBuilder;
use stash::{CacheInterceptor, StashConfig};
use stash_http::DEFAULT_CACHE_STATUS_HEADER;
use stash_reqwest::CacheMiddleware;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("stash=debug")
        .init();

    let config = StashConfig::from_yaml(
        r#"
key:
  prefix: demo
  version: 1
  headers: [accept-language]
replay:
  unsafe_headers: [set-cookie, set-cookie2]
backend:
  type: Moka
  max_capacity: 1000
"#,
    )?;

    let interceptor = CacheInterceptor::builder()
        .storage(config.storage()?)
        .replay_filter(config.replay_filter()?)
        .build();
    let middleware = CacheMiddleware::builder()
        .interceptor(interceptor)
        .cache_status_header(DEFAULT_CACHE_STATUS_HEADER)
        .build();
    let client = ClientBuilder::new(Client::new()).with(middleware).build();

    for language in ["en", "de", "en", "de"] {
        let response = client
            .get("http://www.example.com/")
            .header("accept-language", language)
            .send()
            .await?;
        println!(
            "accept-language={language} x-cache-status={:?}",
            response.headers().get(DEFAULT_CACHE_STATUS_HEADER)
        );
    }

    Ok(())
}
