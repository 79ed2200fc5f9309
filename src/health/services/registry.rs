//! Health registry: named checkers, concurrent fan-out, cached results.
//!
//! Provides [`HealthRegistry`], which keeps one checker per service name
//! and the last result each produced. Every check runs on its own spawned
//! task and records its result when it finishes, so a caller that stops
//! waiting does not lose results that complete afterwards.

use crate::health::{
    domain::{HealthResult, ServiceName},
    ports::HealthChecker,
};
use crate::worker_pool::panic_message;
use futures::FutureExt;
use mockable::Clock;
use std::collections::{BTreeMap, HashMap};
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Health registry tuning.
///
/// # Examples
///
/// ```
/// use infragate::health::services::HealthRegistryConfig;
/// use std::time::Duration;
///
/// let config = HealthRegistryConfig::default();
/// assert_eq!(config.check_timeout, Duration::from_secs(5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthRegistryConfig {
    /// Upper bound for one check; a slower check is reported unhealthy.
    pub check_timeout: Duration,
    /// Maximum number of checks running at once across all callers.
    pub max_concurrent_checks: usize,
}

impl Default for HealthRegistryConfig {
    fn default() -> Self {
        Self {
            check_timeout: Duration::from_secs(5),
            max_concurrent_checks: 8,
        }
    }
}

#[derive(Default)]
struct RegistryState {
    checkers: HashMap<ServiceName, Arc<dyn HealthChecker>>,
    last_results: HashMap<ServiceName, HealthResult>,
}

/// Registry of named health checkers and their last results.
///
/// Cloning yields another handle onto the same registry.
pub struct HealthRegistry<C>
where
    C: Clock + Send + Sync + 'static,
{
    state: Arc<RwLock<RegistryState>>,
    permits: Arc<Semaphore>,
    config: HealthRegistryConfig,
    clock: Arc<C>,
}

impl<C> Clone for HealthRegistry<C>
where
    C: Clock + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            permits: Arc::clone(&self.permits),
            config: self.config,
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<C> HealthRegistry<C>
where
    C: Clock + Send + Sync + 'static,
{
    /// Creates an empty registry.
    ///
    /// A zero `max_concurrent_checks` is raised to one.
    #[must_use]
    pub fn new(config: HealthRegistryConfig, clock: Arc<C>) -> Self {
        Self {
            state: Arc::new(RwLock::new(RegistryState::default())),
            permits: Arc::new(Semaphore::new(config.max_concurrent_checks.max(1))),
            config,
            clock,
        }
    }

    /// Returns the registry configuration.
    #[must_use]
    pub const fn config(&self) -> &HealthRegistryConfig {
        &self.config
    }

    /// Registers `checker` under its name, replacing any previous checker
    /// with that name.
    pub fn register(&self, checker: Arc<dyn HealthChecker>) {
        let name = checker.name().clone();
        let replaced = self
            .write_state()
            .checkers
            .insert(name.clone(), checker)
            .is_some();
        info!(service = %name, replaced, "health checker registered");
    }

    /// Returns `true` when a checker is registered under `name`.
    #[must_use]
    pub fn is_registered(&self, name: &ServiceName) -> bool {
        self.read_state().checkers.contains_key(name)
    }

    /// Returns the registered service names in sorted order.
    #[must_use]
    pub fn registered_names(&self) -> Vec<ServiceName> {
        let mut names: Vec<_> = self.read_state().checkers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Checks one service and caches the result.
    ///
    /// An unregistered name yields an `unknown` result without invoking or
    /// recording anything.
    pub async fn check_single(&self, name: &ServiceName) -> HealthResult {
        let registered = self.read_state().checkers.get(name).cloned();
        let Some(checker) = registered else {
            debug!(service = %name, "health check requested for unregistered service");
            return HealthResult::unknown(name.clone(), self.clock.utc());
        };
        let handle = self.spawn_check(name.clone(), checker);
        self.join_check(name, handle).await
    }

    /// Checks every registered service concurrently and caches each result.
    ///
    /// The checker set is snapshotted first; checkers registered while the
    /// fan-out runs are picked up by the next call.
    pub async fn check_all(&self) -> BTreeMap<ServiceName, HealthResult> {
        let snapshot: Vec<_> = self
            .read_state()
            .checkers
            .iter()
            .map(|(name, checker)| (name.clone(), Arc::clone(checker)))
            .collect();

        let pending: Vec<_> = snapshot
            .into_iter()
            .map(|(name, checker)| {
                let handle = self.spawn_check(name.clone(), checker);
                async move { (name.clone(), self.join_check(&name, handle).await) }
            })
            .collect();

        futures::future::join_all(pending)
            .await
            .into_iter()
            .collect()
    }

    /// Returns the cached result for `name`, if any check has completed.
    #[must_use]
    pub fn get_cached(&self, name: &ServiceName) -> Option<HealthResult> {
        self.read_state().last_results.get(name).cloned()
    }

    /// Returns every cached result.
    #[must_use]
    pub fn get_all_cached(&self) -> BTreeMap<ServiceName, HealthResult> {
        self.read_state()
            .last_results
            .iter()
            .map(|(name, result)| (name.clone(), result.clone()))
            .collect()
    }

    /// Checks every service and derives a synthetic `system` result.
    ///
    /// The system is healthy when every checked service is healthy,
    /// including when nothing is registered. Otherwise the message lists the
    /// unhealthy services in name order.
    pub async fn overall_health(&self) -> HealthResult {
        let started = Instant::now();
        let results = self.check_all().await;
        let unhealthy: Vec<&str> = results
            .iter()
            .filter(|(_, result)| !result.status().is_healthy())
            .map(|(name, _)| name.as_str())
            .collect();

        let checked_at = self.clock.utc();
        let overall = if unhealthy.is_empty() {
            HealthResult::healthy(ServiceName::system(), checked_at)
                .with_message(format!("all {} services healthy", results.len()))
        } else {
            HealthResult::unhealthy(
                ServiceName::system(),
                checked_at,
                format!("unhealthy services: {}", unhealthy.join(", ")),
            )
        };
        overall.with_duration(started.elapsed())
    }

    /// Probes `checker` once and registers it only if the probe is healthy.
    ///
    /// This is the registration path used after a collaborator has been
    /// reached successfully with a request's credentials. The probe result
    /// is cached only when the checker was registered.
    pub async fn probe_and_register(&self, checker: Arc<dyn HealthChecker>) -> HealthResult {
        let name = checker.name().clone();
        let result = run_check(
            &name,
            checker.as_ref(),
            self.config.check_timeout,
            self.clock.as_ref(),
        )
        .await;
        if result.status().is_healthy() {
            self.register(checker);
            record(&self.state, result.clone());
        } else {
            debug!(service = %name, "probe failed; checker not registered");
        }
        result
    }

    fn spawn_check(
        &self,
        name: ServiceName,
        checker: Arc<dyn HealthChecker>,
    ) -> JoinHandle<HealthResult> {
        let permits = Arc::clone(&self.permits);
        let state = Arc::clone(&self.state);
        let clock = Arc::clone(&self.clock);
        let timeout = self.config.check_timeout;

        tokio::spawn(async move {
            // The semaphore is never closed, so acquisition only fails if
            // that changes; checking without a permit is the safe fallback.
            let _permit = permits.acquire_owned().await.ok();
            let result = run_check(&name, checker.as_ref(), timeout, clock.as_ref()).await;
            record(&state, result.clone());
            result
        })
    }

    async fn join_check(
        &self,
        name: &ServiceName,
        handle: JoinHandle<HealthResult>,
    ) -> HealthResult {
        match handle.await {
            Ok(result) => result,
            Err(err) => {
                warn!(service = %name, error = %err, "health check task aborted");
                let result = HealthResult::unhealthy(
                    name.clone(),
                    self.clock.utc(),
                    format!("health check aborted: {err}"),
                );
                record(&self.state, result.clone());
                result
            }
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, RegistryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

async fn run_check<C>(
    name: &ServiceName,
    checker: &dyn HealthChecker,
    timeout: Duration,
    clock: &C,
) -> HealthResult
where
    C: Clock + ?Sized,
{
    let started = Instant::now();
    let probe = AssertUnwindSafe(async { checker.check().await }).catch_unwind();
    let outcome = tokio::time::timeout(timeout, probe).await;
    let elapsed = started.elapsed();
    let checked_at = clock.utc();

    let result = match outcome {
        Ok(Ok(Ok(()))) => HealthResult::healthy(name.clone(), checked_at),
        Ok(Ok(Err(err))) => HealthResult::unhealthy(name.clone(), checked_at, err.to_string()),
        Ok(Err(payload)) => HealthResult::unhealthy(
            name.clone(),
            checked_at,
            format!("health check panicked: {}", panic_message(&*payload)),
        ),
        Err(_) => HealthResult::unhealthy(
            name.clone(),
            checked_at,
            format!("health check timed out after {}ms", timeout.as_millis()),
        ),
    };

    if result.status().is_healthy() {
        debug!(service = %name, elapsed_ms = elapsed.as_millis(), "health check passed");
    } else {
        warn!(
            service = %name,
            elapsed_ms = elapsed.as_millis(),
            message = result.message().unwrap_or_default(),
            "health check failed"
        );
    }
    result.with_duration(elapsed)
}

fn record(state: &RwLock<RegistryState>, result: HealthResult) {
    let mut guard = state.write().unwrap_or_else(PoisonError::into_inner);
    guard.last_results.insert(result.name().clone(), result);
}
