use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, Response, StatusCode, Version};
use serde::{Deserialize, Serialize};

use crate::RequestContext;

/// Immutable snapshot of an HTTP response, the unit stored in the cache.
///
/// The header multimap keeps duplicates and the order of values per name.
/// Decoding rejects an invalid status code, HTTP version, header name or
/// header value, so a damaged entry never turns into a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedResponse {
    #[serde(with = "status_code")]
    status: StatusCode,
    #[serde(with = "http_version")]
    version: Version,
    #[serde(with = "header_map")]
    headers: HeaderMap,
    body: Bytes,
}

impl CachedResponse {
    /// Creates an HTTP/1.1 response with no headers and an empty body.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            version: Version::HTTP_11,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    /// Takes a snapshot of a fully buffered response.
    pub fn from_response(response: Response<Bytes>) -> Self {
        let (parts, body) = response.into_parts();
        Self {
            status: parts.status,
            version: parts.version,
            headers: parts.headers,
            body,
        }
    }

    /// Rebuilds an [`http::Response`] from the snapshot.
    pub fn into_response(self) -> Response<Bytes> {
        let mut response = Response::new(self.body);
        *response.status_mut() = self.status;
        *response.version_mut() = self.version;
        *response.headers_mut() = self.headers;
        response
    }

    pub fn with_version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    /// Appends a header value, keeping any existing values for `name`.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }
}

impl From<Response<Bytes>> for CachedResponse {
    fn from(response: Response<Bytes>) -> Self {
        Self::from_response(response)
    }
}

/// A completed exchange as seen by the post-send step.
///
/// `response` is `None` when the transport failed and no response exists.
#[derive(Debug, Clone)]
pub struct ResponseContext {
    request: RequestContext,
    response: Option<CachedResponse>,
}

impl ResponseContext {
    pub fn new(request: RequestContext, response: Option<CachedResponse>) -> Self {
        Self { request, response }
    }

    pub fn request(&self) -> &RequestContext {
        &self.request
    }

    pub fn response(&self) -> Option<&CachedResponse> {
        self.response.as_ref()
    }

    pub fn into_parts(self) -> (RequestContext, Option<CachedResponse>) {
        (self.request, self.response)
    }
}

mod status_code {
    use http::StatusCode;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(status: &StatusCode, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(status.as_u16())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<StatusCode, D::Error> {
        let code = u16::deserialize(deserializer)?;
        StatusCode::from_u16(code).map_err(D::Error::custom)
    }
}

mod http_version {
    use http::Version;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(version: &Version, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{version:?}"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Version, D::Error> {
        let value = String::deserialize(deserializer)?;
        match value.as_str() {
            "HTTP/0.9" => Ok(Version::HTTP_09),
            "HTTP/1.0" => Ok(Version::HTTP_10),
            "HTTP/1.1" => Ok(Version::HTTP_11),
            "HTTP/2.0" => Ok(Version::HTTP_2),
            "HTTP/3.0" => Ok(Version::HTTP_3),
            other => Err(D::Error::custom(format!("unknown http version {other:?}"))),
        }
    }
}

mod header_map {
    use bytes::Bytes;
    use http::{HeaderMap, HeaderName, HeaderValue};
    use serde::ser::SerializeSeq;
    use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error};

    struct RawValue<'a>(&'a [u8]);

    impl Serialize for RawValue<'_> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_bytes(self.0)
        }
    }

    // `len` counts values, not names, so it matches what `iter` yields.
    // Length-prefixed formats need it up front.
    pub fn serialize<S: Serializer>(headers: &HeaderMap, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(headers.len()))?;
        for (name, value) in headers {
            seq.serialize_element(&(name.as_str(), RawValue(value.as_bytes())))?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<HeaderMap, D::Error> {
        let pairs = Vec::<(String, Bytes)>::deserialize(deserializer)?;
        let mut headers = HeaderMap::with_capacity(pairs.len());
        for (name, value) in pairs {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(D::Error::custom)?;
            let value = HeaderValue::from_maybe_shared(value).map_err(D::Error::custom)?;
            headers.append(name, value);
        }
        Ok(headers)
    }
}
