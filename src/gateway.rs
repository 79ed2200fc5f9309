//! Explicit wiring of the gateway core.
//!
//! [`GatewayCore`] owns one request coordinator (cache plus worker pool)
//! and one health registry, built from a validated [`CoreConfig`]. The HTTP
//! layer receives it by value or behind an `Arc`; nothing here is global.

use crate::cache::TtlCache;
use crate::config::{ConfigError, CoreConfig};
use crate::coordinator::RequestCoordinator;
use crate::health::services::HealthRegistry;
use crate::worker_pool::WorkerPool;
use mockable::{Clock, DefaultClock};
use std::sync::Arc;
use tracing::info;

/// The cache, worker pool, and health registry of one gateway process.
pub struct GatewayCore<V, C = DefaultClock>
where
    V: Clone + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    config: CoreConfig,
    coordinator: RequestCoordinator<V>,
    health: HealthRegistry<C>,
}

impl<V> GatewayCore<V, DefaultClock>
where
    V: Clone + Send + Sync + 'static,
{
    /// Builds the core using the system clock for health timestamps.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `config` fails validation.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn from_config(config: CoreConfig) -> Result<Self, ConfigError> {
        Self::with_clock(config, Arc::new(DefaultClock))
    }
}

impl<V, C> GatewayCore<V, C>
where
    V: Clone + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Builds the core with an injected clock.
    ///
    /// Starts the cache sweeper and the pool workers on the current runtime.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `config` fails validation.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn with_clock(config: CoreConfig, clock: Arc<C>) -> Result<Self, ConfigError> {
        config.validate()?;

        let cache = TtlCache::with_sweeper(config.cache.ttl);
        let pool = WorkerPool::new(config.pool);
        let health = HealthRegistry::new(config.health, clock);

        info!(
            cache_ttl_secs = config.cache.ttl.as_secs(),
            workers = config.pool.workers,
            check_timeout_ms = config.health.check_timeout.as_millis(),
            "gateway core ready"
        );

        Ok(Self {
            config,
            coordinator: RequestCoordinator::new(cache, pool),
            health,
        })
    }

    /// Returns the configuration the core was built from.
    #[must_use]
    pub const fn config(&self) -> &CoreConfig {
        &self.config
    }

    /// Returns the request coordinator.
    #[must_use]
    pub const fn coordinator(&self) -> &RequestCoordinator<V> {
        &self.coordinator
    }

    /// Returns the health registry.
    #[must_use]
    pub const fn health(&self) -> &HealthRegistry<C> {
        &self.health
    }

    /// Drains the worker pool and empties the cache.
    ///
    /// Jobs already queued still run; their results are discarded with the
    /// cache.
    pub async fn shutdown(&self) {
        self.coordinator.pool().shutdown().await;
        self.coordinator.cache().clear();
        info!("gateway core shut down");
    }
}
