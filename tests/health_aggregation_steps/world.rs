//! Shared world state for health aggregation BDD scenarios.

use std::sync::Arc;

use infragate::health::{
    domain::{HealthResult, HealthStatus, ServiceName},
    services::{HealthRegistry, HealthRegistryConfig},
};
use mockable::DefaultClock;
use rstest::fixture;

/// Registry type used by the BDD world.
pub type TestRegistry = HealthRegistry<DefaultClock>;

/// Scenario world for health aggregation behaviour tests.
pub struct HealthWorld {
    /// The registry under test.
    pub registry: TestRegistry,
    /// Result of the last overall evaluation.
    pub last_overall: Option<HealthResult>,
    /// Result of the last single-service check.
    pub last_single: Option<HealthResult>,
}

impl HealthWorld {
    /// Creates a world around an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: HealthRegistry::new(HealthRegistryConfig::default(), Arc::new(DefaultClock)),
            last_overall: None,
            last_single: None,
        }
    }
}

impl Default for HealthWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> HealthWorld {
    HealthWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Parses a service name from step text.
///
/// # Errors
///
/// Returns an error when the name fails validation.
pub fn parse_service(raw: &str) -> Result<ServiceName, eyre::Report> {
    ServiceName::new(raw).map_err(|err| eyre::eyre!("invalid service name '{raw}': {err}"))
}

/// Parses a health status from step text.
///
/// # Errors
///
/// Returns an error for unrecognised status strings.
pub fn parse_status(raw: &str) -> Result<HealthStatus, eyre::Report> {
    HealthStatus::try_from(raw).map_err(|err| eyre::eyre!("{err}"))
}
