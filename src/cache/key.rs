//! Composite cache key helper.

use std::fmt;

/// Separator placed between key parts.
const KEY_SEPARATOR: char = ':';

/// A cache key built from one or more parts, for example
/// `resource-kind:namespace`.
///
/// # Examples
///
/// ```
/// use infragate::cache::CacheKey;
///
/// let key = CacheKey::compose(["pods", "kube-system"]);
/// assert_eq!(key.as_str(), "pods:kube-system");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Creates a key from a single raw string.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Joins `parts` with `:`. Empty parts are kept so that positional
    /// keys such as `backups:` (all namespaces) stay distinct.
    #[must_use]
    pub fn compose<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut key = String::new();
        for (index, part) in parts.into_iter().enumerate() {
            if index > 0 {
                key.push(KEY_SEPARATOR);
            }
            key.push_str(part.as_ref());
        }
        Self(key)
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<CacheKey> for String {
    fn from(key: CacheKey) -> Self {
        key.0
    }
}

impl From<&str> for CacheKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
