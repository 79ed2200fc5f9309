//! Cache-first fetch orchestration.

use super::CoordinatorError;
use crate::cache::TtlCache;
use crate::worker_pool::WorkerPool;
use std::future::Future;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Value returned by a successful fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched<V> {
    /// The cached or freshly computed value.
    pub value: V,
    /// Whether the value came from the cache without scheduling work.
    pub cache_hit: bool,
}

impl<V> Fetched<V> {
    const fn hit(value: V) -> Self {
        Self {
            value,
            cache_hit: true,
        }
    }

    const fn computed(value: V) -> Self {
        Self {
            value,
            cache_hit: false,
        }
    }
}

/// Answers keyed requests from a [`TtlCache`], falling back to work
/// scheduled on a [`WorkerPool`].
///
/// Cloning yields another handle onto the same cache and pool.
#[derive(Clone)]
pub struct RequestCoordinator<V>
where
    V: Clone + Send + Sync + 'static,
{
    cache: TtlCache<V>,
    pool: WorkerPool,
}

impl<V> RequestCoordinator<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Creates a coordinator over an existing cache and pool.
    #[must_use]
    pub const fn new(cache: TtlCache<V>, pool: WorkerPool) -> Self {
        Self { cache, pool }
    }

    /// Returns the cache backing this coordinator.
    #[must_use]
    pub const fn cache(&self) -> &TtlCache<V> {
        &self.cache
    }

    /// Returns the pool running cache misses.
    #[must_use]
    pub const fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    /// Returns the value for `key`, computing it on the pool on a miss.
    ///
    /// An already-cancelled token short-circuits before the cache or the
    /// pool is touched. Cancelling while waiting returns immediately but
    /// does not retract the job: a value it produces later is still cached.
    /// Failed computations are never cached.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinatorError::Cancelled`] when `cancel` fires first,
    /// [`CoordinatorError::Pool`] when the pool refuses the job, and
    /// [`CoordinatorError::Compute`], [`CoordinatorError::Panicked`] or
    /// [`CoordinatorError::Abandoned`] for the job's own failure.
    pub async fn fetch<F, Fut, E>(
        &self,
        key: &str,
        cancel: &CancellationToken,
        compute: F,
    ) -> Result<Fetched<V>, CoordinatorError<E>>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<V, E>> + Send + 'static,
        E: Send + 'static,
    {
        if cancel.is_cancelled() {
            debug!(key, "fetch cancelled before lookup");
            return Err(CoordinatorError::Cancelled);
        }

        if let Some(value) = self.cache.get(key) {
            debug!(key, "cache hit");
            return Ok(Fetched::hit(value));
        }

        let cache = self.cache.clone();
        let job_key = key.to_owned();
        let job = move || async move {
            let value = compute().await?;
            cache.set(job_key, value.clone());
            Ok::<_, E>(value)
        };

        let handle = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                debug!(key, "fetch cancelled while waiting for a queue slot");
                return Err(CoordinatorError::Cancelled);
            }
            submitted = self.pool.execute(job) => submitted?,
        };

        let task = handle.id();
        debug!(key, task = %task, "cache miss; job scheduled");
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                debug!(key, task = %task, "fetch cancelled; job left running");
                Err(CoordinatorError::Cancelled)
            }
            outcome = handle => outcome.map(Fetched::computed).map_err(CoordinatorError::from),
        }
    }
}
