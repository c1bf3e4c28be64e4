//! Conversions between reqwest types and the cache's HTTP model.

use bytes::Bytes;
use http::Uri;
use reqwest::{Request, Response};
use reqwest_middleware::{Error, Result};
use stash_core::RequestConfig;
use stash_http::{CachedResponse, RequestContext};

/// Builds the cache's view of `request` without consuming it.
///
/// Streaming bodies are not visible; only bodies reqwest holds in memory are.
pub(crate) fn request_context(request: &Request, config: RequestConfig) -> Result<RequestContext> {
    let uri: Uri = request.url().as_str().parse().map_err(Error::middleware)?;
    let mut context = RequestContext::new(request.method().clone(), uri)
        .with_headers(request.headers().clone())
        .with_config(config);
    if let Some(body) = request.body().and_then(reqwest::Body::as_bytes) {
        context = context.with_body(Bytes::copy_from_slice(body));
    }
    Ok(context)
}

/// Buffers a network response into a snapshot.
pub(crate) async fn buffer_response(response: Response) -> Result<CachedResponse> {
    let status = response.status();
    let version = response.version();
    let headers = response.headers().clone();
    let body = response.bytes().await?;

    let mut snapshot = CachedResponse::new(status)
        .with_version(version)
        .with_body(body);
    *snapshot.headers_mut() = headers;
    Ok(snapshot)
}

/// Rebuilds a reqwest response carrying the final request config.
pub(crate) fn into_reqwest(response: CachedResponse, config: RequestConfig) -> Response {
    let mut response = response.into_response();
    response.extensions_mut().insert(config);
    Response::from(response)
}
