//! Errors surfaced by cancellable cache lookups.

use thiserror::Error;

/// Outcome of a failed [`TtlCache::with_cancellation`](super::TtlCache::with_cancellation)
/// lookup.
#[derive(Debug, Error)]
pub enum CacheError<E> {
    /// The caller's cancellation token fired before the compute started.
    #[error("cache lookup cancelled before compute started")]
    Cancelled,

    /// The compute future failed; the error is passed through unchanged.
    #[error(transparent)]
    Compute(E),
}

impl<E> CacheError<E> {
    /// Returns `true` for [`CacheError::Cancelled`].
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
