#![allow(dead_code)]

pub mod test_backend;

use http::header::{CONTENT_TYPE, SET_COOKIE};
use http::{HeaderValue, Method, StatusCode};
use stash_core::RequestConfig;
use stash_http::{CachedResponse, RequestContext};

pub use test_backend::{ErrorBackend, TestBackend};

pub const URL: &str = "http://www.example.com/";

pub fn get(url: &str) -> RequestContext {
    RequestContext::new(Method::GET, url.parse().unwrap())
}

pub fn get_with(url: &str, config: RequestConfig) -> RequestContext {
    get(url).with_config(config)
}

/// A network response carrying a session cookie.
pub fn network_response(status: StatusCode, body: &'static str) -> CachedResponse {
    CachedResponse::new(status)
        .with_header(CONTENT_TYPE, HeaderValue::from_static("text/plain"))
        .with_header(SET_COOKIE, HeaderValue::from_static("session=abc"))
        .with_body(body)
}
