//! Shared fixtures for in-memory gateway integration tests.

use infragate::cache::TtlCache;
use infragate::coordinator::RequestCoordinator;
use infragate::worker_pool::{WorkerPool, WorkerPoolConfig};
use std::future::Future;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Cached value type used across coordinator tests.
pub type Listing = Vec<String>;

/// Time-to-live used by coordinator fixtures.
pub const TEST_TTL: Duration = Duration::from_secs(60);

/// Builds a coordinator over a fresh cache and a two-worker pool.
///
/// Must be called from within a Tokio runtime.
#[must_use]
pub fn coordinator() -> RequestCoordinator<Listing> {
    RequestCoordinator::new(
        TtlCache::new(TEST_TTL),
        WorkerPool::new(WorkerPoolConfig::new(2, 8)),
    )
}

/// Counts how many times a collaborator call actually ran.
#[derive(Debug, Clone, Default)]
pub struct CallCounter(Arc<AtomicUsize>);

impl CallCounter {
    /// Records one call.
    pub fn hit(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    /// Returns the number of recorded calls.
    #[must_use]
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Simulates listing pods in a namespace, recording the call on `counter`.
pub fn list_pods(
    counter: &CallCounter,
    namespace: &'static str,
) -> impl Future<Output = io::Result<Listing>> + Send + use<> {
    let calls = counter.clone();
    async move {
        calls.hit();
        tokio::task::yield_now().await;
        Ok(vec![format!("{namespace}/api-0"), format!("{namespace}/api-1")])
    }
}
