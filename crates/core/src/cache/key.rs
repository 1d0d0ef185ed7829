//! Cache key normalization.

use std::fmt;

/// Normalized identity of a cached answer.
///
/// Two queries that differ only by letter case or by whitespace (leading,
/// trailing, or repeated between words) produce the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Normalize a raw query into a cache key.
    pub fn normalize(query: &str) -> Self {
        Self(collapse_whitespace(query).to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Trim a query and collapse inner whitespace runs to single spaces.
///
/// Case is preserved, so the result is suitable for display and lookups.
pub fn collapse_whitespace(query: &str) -> String {
    query.split_whitespace().collect::<Vec<_>>().join(" ")
}
