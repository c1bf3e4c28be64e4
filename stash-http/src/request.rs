use bytes::Bytes;
use http::{HeaderMap, Method, Request, Uri, request::Parts};
use stash_core::RequestConfig;

/// An outgoing request as seen by the cache.
///
/// Holds everything the fingerprint extractors and request predicates may
/// look at: method, URI, headers, the buffered body (if the host client can
/// expose one) and the per-request [`RequestConfig`] slot.
///
/// The interceptor never alters method, URI, headers or body. The only thing
/// it writes is the served-from-cache flag in [`config_mut`](Self::config_mut).
#[derive(Debug, Clone)]
pub struct RequestContext {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Option<Bytes>,
    config: RequestConfig,
}

impl RequestContext {
    /// Creates a request with no headers, no body and an empty config slot.
    pub fn new(method: Method, uri: Uri) -> Self {
        Self {
            method,
            uri,
            headers: HeaderMap::new(),
            body: None,
            config: RequestConfig::new(),
        }
    }

    /// Builds a context from the parts of an [`http::Request`].
    pub fn from_parts(parts: Parts, body: Option<Bytes>) -> Self {
        Self {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            body,
            config: parts
                .extensions
                .get::<RequestConfig>()
                .cloned()
                .unwrap_or_default(),
        }
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_config(mut self, config: RequestConfig) -> Self {
        self.config = config;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Buffered request body, `None` if the host did not provide one.
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    pub fn config(&self) -> &RequestConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut RequestConfig {
        &mut self.config
    }

    /// Consumes the context, returning the config slot.
    pub fn into_config(self) -> RequestConfig {
        self.config
    }
}

impl From<Request<Bytes>> for RequestContext {
    fn from(request: Request<Bytes>) -> Self {
        let (parts, body) = request.into_parts();
        let body = (!body.is_empty()).then_some(body);
        Self::from_parts(parts, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_request_picks_up_config_extension() {
        let mut request = Request::builder()
            .method(Method::POST)
            .uri("http://example.com/submit")
            .header("accept", "text/plain")
            .body(Bytes::from_static(b"payload"))
            .unwrap();
        request
            .extensions_mut()
            .insert(RequestConfig::new().with("requestFresh", true));

        let context = RequestContext::from(request);
        assert_eq!(context.method(), &Method::POST);
        assert_eq!(context.uri().path(), "/submit");
        assert_eq!(context.headers()["accept"], "text/plain");
        assert_eq!(context.body().map(|b| &b[..]), Some(&b"payload"[..]));
        assert_eq!(context.config().get_bool("requestFresh"), Some(true));
    }

    #[test]
    fn test_empty_body_is_absent() {
        let request = Request::get("http://example.com/").body(Bytes::new()).unwrap();
        let context = RequestContext::from(request);
        assert!(context.body().is_none());
        assert!(context.config().iter().next().is_none());
    }
}
