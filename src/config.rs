//! Core configuration.
//!
//! [`CoreConfig`] aggregates the cache, pool, and health registry settings.
//! Values come from defaults, named presets, or `INFRAGATE_*` environment
//! variables, and are validated before the core is built.

use crate::cache::CacheConfig;
use crate::health::services::HealthRegistryConfig;
use crate::worker_pool::WorkerPoolConfig;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Cache time-to-live in whole seconds.
pub const CACHE_TTL_SECS_VAR: &str = "INFRAGATE_CACHE_TTL_SECS";
/// Number of worker pool workers.
pub const WORKERS_VAR: &str = "INFRAGATE_WORKERS";
/// Worker pool queue capacity.
pub const QUEUE_CAPACITY_VAR: &str = "INFRAGATE_QUEUE_CAPACITY";
/// Per-check health timeout in milliseconds.
pub const HEALTH_TIMEOUT_MS_VAR: &str = "INFRAGATE_HEALTH_TIMEOUT_MS";
/// Maximum number of concurrent health checks.
pub const HEALTH_CONCURRENCY_VAR: &str = "INFRAGATE_HEALTH_CONCURRENCY";

/// Errors raised while loading or validating configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable held a value that could not be parsed.
    #[error("invalid value '{value}' for {variable}: {reason}")]
    InvalidValue {
        /// Variable name.
        variable: &'static str,
        /// Raw value as read.
        value: String,
        /// Parser message.
        reason: String,
    },

    /// The cache TTL is zero.
    #[error("cache ttl must be greater than zero")]
    ZeroCacheTtl,

    /// The pool has no workers.
    #[error("worker pool must have at least one worker")]
    ZeroWorkers,

    /// The pool queue holds no tasks.
    #[error("worker pool queue capacity must be greater than zero")]
    ZeroQueueCapacity,

    /// The health check timeout is zero.
    #[error("health check timeout must be greater than zero")]
    ZeroCheckTimeout,

    /// No health check may run at once.
    #[error("health check concurrency must be greater than zero")]
    ZeroCheckConcurrency,
}

/// Configuration for every component of the gateway core.
///
/// # Examples
///
/// ```
/// use infragate::config::CoreConfig;
///
/// let config = CoreConfig::default();
/// assert!(config.validate().is_ok());
/// assert_eq!(config.pool.workers, 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CoreConfig {
    /// Response cache settings.
    pub cache: CacheConfig,
    /// Worker pool sizing.
    pub pool: WorkerPoolConfig,
    /// Health registry tuning.
    pub health: HealthRegistryConfig,
}

impl CoreConfig {
    /// Small footprint for local runs and tests.
    ///
    /// Short cache TTL, two workers, and a one second health timeout.
    #[must_use]
    pub const fn lightweight() -> Self {
        Self {
            cache: CacheConfig {
                ttl: Duration::from_secs(30),
            },
            pool: WorkerPoolConfig::new(2, 16),
            health: HealthRegistryConfig {
                check_timeout: Duration::from_secs(1),
                max_concurrent_checks: 2,
            },
        }
    }

    /// Loads configuration from the process environment.
    ///
    /// Unset variables keep their default values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable cannot be parsed or the
    /// resulting configuration is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable cannot be parsed or the
    /// resulting configuration is invalid.
    pub fn from_lookup<L>(lookup: L) -> Result<Self, ConfigError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let ttl_secs = parse_var(&lookup, CACHE_TTL_SECS_VAR, defaults.cache.ttl.as_secs())?;
        let workers = parse_var(&lookup, WORKERS_VAR, defaults.pool.workers)?;
        let queue_capacity = parse_var(&lookup, QUEUE_CAPACITY_VAR, defaults.pool.queue_capacity)?;
        let timeout_ms = parse_var(
            &lookup,
            HEALTH_TIMEOUT_MS_VAR,
            u64::try_from(defaults.health.check_timeout.as_millis()).unwrap_or(u64::MAX),
        )?;
        let concurrency = parse_var(
            &lookup,
            HEALTH_CONCURRENCY_VAR,
            defaults.health.max_concurrent_checks,
        )?;

        let config = Self {
            cache: CacheConfig {
                ttl: Duration::from_secs(ttl_secs),
            },
            pool: WorkerPoolConfig::new(workers, queue_capacity),
            health: HealthRegistryConfig {
                check_timeout: Duration::from_millis(timeout_ms),
                max_concurrent_checks: concurrency,
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks that every size and duration is non-zero.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.cache.ttl.is_zero() {
            return Err(ConfigError::ZeroCacheTtl);
        }
        if self.pool.workers == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        if self.pool.queue_capacity == 0 {
            return Err(ConfigError::ZeroQueueCapacity);
        }
        if self.health.check_timeout.is_zero() {
            return Err(ConfigError::ZeroCheckTimeout);
        }
        if self.health.max_concurrent_checks == 0 {
            return Err(ConfigError::ZeroCheckConcurrency);
        }
        Ok(())
    }
}

fn parse_var<L, T>(lookup: &L, variable: &'static str, default: T) -> Result<T, ConfigError>
where
    L: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Some(raw) = lookup(variable) else {
        return Ok(default);
    };
    raw.trim()
        .parse()
        .map_err(|err: T::Err| ConfigError::InvalidValue {
            variable,
            value: raw.clone(),
            reason: err.to_string(),
        })
}
