//! In-memory health checker adapter.

use crate::health::{
    domain::ServiceName,
    ports::{HealthCheckError, HealthCheckResult, HealthChecker},
};
use async_trait::async_trait;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

/// Scripted health checker.
///
/// This adapter answers from in-memory state without contacting any
/// service. It is suitable for unit and integration tests and for local
/// runs without real collaborators. Clones share state, so a test can keep
/// one handle to flip the outcome after registering another.
#[derive(Debug, Clone)]
pub struct InMemoryHealthChecker {
    name: ServiceName,
    state: Arc<RwLock<InMemoryCheckerState>>,
}

#[derive(Debug, Default)]
struct InMemoryCheckerState {
    failure: Option<String>,
    delay: Option<Duration>,
    calls: usize,
}

impl InMemoryHealthChecker {
    /// Creates a checker that reports healthy.
    #[must_use]
    pub fn healthy(name: ServiceName) -> Self {
        Self {
            name,
            state: Arc::new(RwLock::new(InMemoryCheckerState::default())),
        }
    }

    /// Creates a checker that fails with `message`.
    #[must_use]
    pub fn failing(name: ServiceName, message: impl Into<String>) -> Self {
        let checker = Self::healthy(name);
        checker.set_unhealthy(message);
        checker
    }

    /// Makes subsequent checks succeed.
    pub fn set_healthy(&self) {
        self.write_state(|state| state.failure = None);
    }

    /// Makes subsequent checks fail with `message`.
    pub fn set_unhealthy(&self, message: impl Into<String>) {
        let failure = message.into();
        self.write_state(|state| state.failure = Some(failure));
    }

    /// Delays every subsequent check by `delay` before answering.
    pub fn set_delay(&self, delay: Duration) {
        self.write_state(|state| state.delay = Some(delay));
    }

    /// Returns how many checks have started.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .calls
    }

    fn write_state(&self, update: impl FnOnce(&mut InMemoryCheckerState)) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        update(&mut state);
    }
}

#[async_trait]
impl HealthChecker for InMemoryHealthChecker {
    fn name(&self) -> &ServiceName {
        &self.name
    }

    async fn check(&self) -> HealthCheckResult {
        let delay = {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            state.calls += 1;
            state.delay
        };
        if let Some(wait) = delay {
            tokio::time::sleep(wait).await;
        }

        let failure = self
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .failure
            .clone();
        failure.map_or(Ok(()), |message| Err(HealthCheckError::unhealthy(message)))
    }
}
