//! Result of the pre-send step.

/// What the host client should do with a request after the cache was consulted.
///
/// The host reads this value and decides whether to perform the network call:
/// on [`Outcome::Proceed`] it sends the request unchanged, on
/// [`Outcome::ServeCached`] it hands the contained response to the caller and
/// skips the transport entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<R> {
    /// Send the request to the network.
    Proceed,
    /// Short-circuit: answer with this cached response.
    ServeCached(R),
}

impl<R> Outcome<R> {
    /// Returns `true` if the request is answered from the cache.
    pub fn is_cached(&self) -> bool {
        matches!(self, Outcome::ServeCached(_))
    }

    /// Returns the cached response, if any.
    pub fn into_cached(self) -> Option<R> {
        match self {
            Outcome::Proceed => None,
            Outcome::ServeCached(response) => Some(response),
        }
    }

    /// Maps the cached response with `f`.
    pub fn map<T, F>(self, f: F) -> Outcome<T>
    where
        F: FnOnce(R) -> T,
    {
        match self {
            Outcome::Proceed => Outcome::Proceed,
            Outcome::ServeCached(response) => Outcome::ServeCached(f(response)),
        }
    }
}
