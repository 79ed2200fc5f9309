//! Expiring in-memory cache for collaborator results.
//!
//! [`TtlCache`] stores one value per string key for a fixed time-to-live.
//! Expired entries are never returned: they are dropped lazily when a read
//! discovers them and eagerly by an optional background sweeper that runs
//! every half TTL. The cache never fails on its own account; any error seen
//! through [`TtlCache::get_or_set`] or [`TtlCache::with_cancellation`]
//! originates in the caller's compute future.

mod entry;
mod error;
mod key;
mod store;

pub use entry::CacheEntry;
pub use error::CacheError;
pub use key::CacheKey;
pub use store::{CacheConfig, TtlCache};
