use http::HeaderName;
use http::header::SET_COOKIE;

use crate::CachedResponse;

const SET_COOKIE2: HeaderName = HeaderName::from_static("set-cookie2");

/// Headers that must not be replayed from the cache.
///
/// A stored response keeps every header it arrived with; the filter is
/// applied to the copy handed out on a cache hit, never to a response
/// fetched from the network. The default list holds the cookie-setting
/// headers `set-cookie` and `set-cookie2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayFilter {
    headers: Vec<HeaderName>,
}

impl Default for ReplayFilter {
    fn default() -> Self {
        Self {
            headers: vec![SET_COOKIE, SET_COOKIE2],
        }
    }
}

impl ReplayFilter {
    /// Filter removing exactly `headers`.
    pub fn new(headers: impl IntoIterator<Item = HeaderName>) -> Self {
        let mut filter = Self::empty();
        for header in headers {
            filter = filter.with_header(header);
        }
        filter
    }

    /// Filter that removes nothing.
    pub fn empty() -> Self {
        Self {
            headers: Vec::new(),
        }
    }

    /// Adds `header` to the list.
    pub fn with_header(mut self, header: HeaderName) -> Self {
        if !self.headers.contains(&header) {
            self.headers.push(header);
        }
        self
    }

    pub fn headers(&self) -> &[HeaderName] {
        &self.headers
    }

    pub fn is_unsafe(&self, header: &HeaderName) -> bool {
        self.headers.contains(header)
    }

    /// Removes every listed header from `response`, returning how many
    /// header values were dropped.
    pub fn apply(&self, response: &mut CachedResponse) -> usize {
        let headers = response.headers_mut();
        self.headers
            .iter()
            .map(|name| match headers.entry(name) {
                http::header::Entry::Occupied(entry) => entry.remove_entry_mult().1.count(),
                http::header::Entry::Vacant(_) => 0,
            })
            .sum()
    }
}
