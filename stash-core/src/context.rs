//! Cache status of a single request.

/// How a request was answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheStatus {
    /// Cache hit - the stored response was replayed, the network was not used.
    Hit,
    /// Cache miss - the response came from the network, including requests
    /// that had to be fetched fresh.
    #[default]
    Miss,
    /// Fetched from the network and not stored because the response was
    /// declined for caching.
    Bypass,
}

impl CacheStatus {
    /// Returns the status as a string slice.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            CacheStatus::Hit => "hit",
            CacheStatus::Miss => "miss",
            CacheStatus::Bypass => "bypass",
        }
    }

    /// Returns `true` for [`CacheStatus::Hit`].
    #[inline]
    pub const fn is_hit(&self) -> bool {
        matches!(self, CacheStatus::Hit)
    }
}

impl std::fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
