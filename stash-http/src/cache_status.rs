//! Cache status header for responses handed back to the caller.

use http::{HeaderMap, HeaderValue, header::HeaderName};
use stash_core::CacheStatus;

/// Default header name for cache status (HIT/MISS/BYPASS).
///
/// The value is `x-cache-status`. Use builder methods on cache middleware
/// to customize the header name.
pub const DEFAULT_CACHE_STATUS_HEADER: HeaderName = HeaderName::from_static("x-cache-status");

/// Header value for `status`.
pub fn cache_status_value(status: CacheStatus) -> HeaderValue {
    match status {
        CacheStatus::Hit => HeaderValue::from_static("HIT"),
        CacheStatus::Miss => HeaderValue::from_static("MISS"),
        CacheStatus::Bypass => HeaderValue::from_static("BYPASS"),
    }
}

/// Sets `name` to the value for `status`, replacing any previous value.
pub fn set_cache_status(headers: &mut HeaderMap, status: CacheStatus, name: &HeaderName) {
    headers.insert(name.clone(), cache_status_value(status));
}
