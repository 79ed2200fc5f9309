//! Shared TTL cache with lazy and periodic eviction.

use super::{CacheEntry, CacheError};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak,
};
use std::time::Duration;
use tokio::sync::Mutex as AsyncMutex;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Smallest sweep period, so that a tiny TTL never produces a busy loop.
const MIN_SWEEP_PERIOD: Duration = Duration::from_millis(1);

/// Largest sweep period, so that tick deadlines stay representable.
const MAX_SWEEP_PERIOD: Duration = Duration::from_secs(24 * 60 * 60);

/// Per-key gate used by single-flight lookups.
type FlightGate = Arc<AsyncMutex<()>>;

/// Cache configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Lifetime of every entry, counted from its last `set`.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(5 * 60),
        }
    }
}

/// Thread-safe expiring key/value store.
///
/// Cloning the cache yields another handle onto the same entries. When a
/// sweeper was started with [`TtlCache::with_sweeper`] it stops on its own
/// once the last handle is dropped.
#[derive(Debug)]
pub struct TtlCache<V> {
    inner: Arc<CacheInner<V>>,
}

impl<V> Clone for TtlCache<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[derive(Debug)]
struct CacheInner<V> {
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    in_flight: Mutex<HashMap<String, FlightGate>>,
    ttl: Duration,
}

impl<V> CacheInner<V> {
    fn read_entries(&self) -> RwLockReadGuard<'_, HashMap<String, CacheEntry<V>>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_entries(&self) -> RwLockWriteGuard<'_, HashMap<String, CacheEntry<V>>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_in_flight(&self) -> MutexGuard<'_, HashMap<String, FlightGate>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.write_entries();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired_at(now));
        before.saturating_sub(entries.len())
    }
}

impl<V> TtlCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Creates a cache without a background sweeper.
    ///
    /// Expired entries are still never returned; they are only reclaimed
    /// when read or when [`TtlCache::purge_expired`] runs.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(CacheInner {
                entries: RwLock::new(HashMap::new()),
                in_flight: Mutex::new(HashMap::new()),
                ttl,
            }),
        }
    }

    /// Creates a cache and starts a sweeper that purges expired entries
    /// every `ttl / 2`, bounded to between one millisecond and one day.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    #[must_use]
    pub fn with_sweeper(ttl: Duration) -> Self {
        let cache = Self::new(ttl);
        spawn_sweeper(Arc::downgrade(&cache.inner), sweep_period(ttl));
        cache
    }

    /// Returns the configured time-to-live.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.inner.ttl
    }

    /// Inserts or replaces `key`, resetting its expiry to `now + ttl`.
    ///
    /// A TTL too large to add to the current instant stores an entry that
    /// never expires.
    pub fn set(&self, key: impl Into<String>, value: V) {
        let expires_at = Instant::now().checked_add(self.inner.ttl);
        self.inner
            .write_entries()
            .insert(key.into(), CacheEntry::new(value, expires_at));
    }

    /// Returns the value for `key` if present and not expired.
    ///
    /// An expired entry found here is removed before returning `None`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<V> {
        {
            let entries = self.inner.read_entries();
            match entries.get(key) {
                None => return None,
                Some(entry) if !entry.is_expired_at(Instant::now()) => {
                    return Some(entry.value().clone());
                }
                Some(_) => {}
            }
        }

        // Re-check under the write lock: another caller may have refreshed
        // the entry after the read lock was released.
        let mut entries = self.inner.write_entries();
        let now = Instant::now();
        match entries.get(key) {
            Some(entry) if entry.is_expired_at(now) => {
                entries.remove(key);
                None
            }
            Some(entry) => Some(entry.value().clone()),
            None => None,
        }
    }

    /// Removes `key`. Removing an absent key is a no-op.
    pub fn delete(&self, key: &str) {
        self.inner.write_entries().remove(key);
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.inner.write_entries().clear();
    }

    /// Removes every expired entry and returns how many were dropped.
    pub fn purge_expired(&self) -> usize {
        self.inner.purge_expired()
    }

    /// Returns the number of stored entries, including expired entries
    /// that have not been reclaimed yet.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read_entries().len()
    }

    /// Returns `true` when no entries are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the cached value for `key`, or awaits `compute` and caches
    /// its successful result.
    ///
    /// Concurrent callers for the same missing key each run `compute`; use
    /// [`TtlCache::get_or_set_coalesced`] when that matters.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `compute` unchanged. Failures are
    /// never cached.
    pub async fn get_or_set<F, Fut, E>(&self, key: &str, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(key) {
            return Ok(value);
        }
        let value = compute().await?;
        self.set(key, value.clone());
        Ok(value)
    }

    /// Like [`TtlCache::get_or_set`], but honours `token`.
    ///
    /// The token is checked on entry and again immediately before `compute`
    /// starts. Cancellation during `compute` is left to the compute future.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Cancelled`] when the token has fired, or
    /// [`CacheError::Compute`] wrapping the error produced by `compute`.
    pub async fn with_cancellation<F, Fut, E>(
        &self,
        token: &CancellationToken,
        key: &str,
        compute: F,
    ) -> Result<V, CacheError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if token.is_cancelled() {
            return Err(CacheError::Cancelled);
        }
        if let Some(value) = self.get(key) {
            return Ok(value);
        }
        if token.is_cancelled() {
            return Err(CacheError::Cancelled);
        }
        let value = compute().await.map_err(CacheError::Compute)?;
        self.set(key, value.clone());
        Ok(value)
    }

    /// Single-flight variant of [`TtlCache::get_or_set`].
    ///
    /// The first caller for a missing key runs `compute`; callers arriving
    /// while it is in flight wait and then reuse the cached result. When the
    /// in-flight compute fails, the next waiter runs its own `compute`.
    ///
    /// # Errors
    ///
    /// Returns the error produced by this caller's `compute` unchanged.
    pub async fn get_or_set_coalesced<F, Fut, E>(&self, key: &str, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(key) {
            return Ok(value);
        }

        let flight = self.join_flight(key);
        let _turn = flight.gate.lock().await;
        if let Some(value) = self.get(key) {
            return Ok(value);
        }
        let value = compute().await?;
        self.set(key, value.clone());
        Ok(value)
    }

    fn join_flight(&self, key: &str) -> FlightRegistration<'_, V> {
        let gate = Arc::clone(self.inner.lock_in_flight().entry(key.to_owned()).or_default());
        FlightRegistration {
            inner: &self.inner,
            key: key.to_owned(),
            gate,
        }
    }

    #[cfg(test)]
    pub(crate) fn in_flight_len(&self) -> usize {
        self.inner.lock_in_flight().len()
    }
}

/// Membership in a key's single-flight gate.
///
/// Dropping it, including when the lookup future itself is dropped, removes
/// the gate from the in-flight map once no other caller holds it.
struct FlightRegistration<'a, V> {
    inner: &'a CacheInner<V>,
    key: String,
    gate: FlightGate,
}

impl<V> Drop for FlightRegistration<'_, V> {
    fn drop(&mut self) {
        let mut in_flight = self.inner.lock_in_flight();
        // One reference lives in the map and one is held here.
        let is_last_holder = in_flight.get(&self.key).is_some_and(|current| {
            Arc::ptr_eq(current, &self.gate) && Arc::strong_count(&self.gate) <= 2
        });
        if is_last_holder {
            in_flight.remove(&self.key);
        }
    }
}

fn sweep_period(ttl: Duration) -> Duration {
    (ttl / 2).clamp(MIN_SWEEP_PERIOD, MAX_SWEEP_PERIOD)
}

fn spawn_sweeper<V>(cache: Weak<CacheInner<V>>, period: Duration)
where
    V: Send + Sync + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let Some(inner) = cache.upgrade() else {
                break;
            };
            let removed = inner.purge_expired();
            if removed > 0 {
                debug!(removed, "swept expired cache entries");
            }
        }
        debug!("cache dropped; sweeper stopped");
    });
}
