//! Cache entry with a monotonic expiry deadline.

use tokio::time::Instant;

/// A cached value together with the instant it stops being served.
///
/// An entry without a deadline never expires; this is what a TTL too large
/// to add to the current instant produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry<V> {
    value: V,
    expires_at: Option<Instant>,
}

impl<V> CacheEntry<V> {
    /// Creates an entry that expires at `expires_at`, or never for `None`.
    #[must_use]
    pub const fn new(value: V, expires_at: Option<Instant>) -> Self {
        Self { value, expires_at }
    }

    /// Returns the cached value.
    #[must_use]
    pub const fn value(&self) -> &V {
        &self.value
    }

    /// Returns the expiry deadline, if any.
    #[must_use]
    pub const fn expires_at(&self) -> Option<Instant> {
        self.expires_at
    }

    /// Returns `true` once `now` has reached the expiry deadline.
    #[must_use]
    pub fn is_expired_at(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|deadline| now >= deadline)
    }
}
