//! In-memory integration tests for gateway core wiring.

use super::helpers::{CallCounter, Listing, list_pods};
use infragate::config::{ConfigError, CoreConfig};
use infragate::coordinator::CoordinatorError;
use infragate::gateway::GatewayCore;
use infragate::health::{
    adapters::memory::InMemoryHealthChecker,
    domain::{HealthStatus, ServiceName},
};
use infragate::worker_pool::{PoolError, WorkerPoolConfig};
use rstest::rstest;
use std::io;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

fn service(raw: &str) -> ServiceName {
    ServiceName::new(raw).expect("valid service name")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn core_is_built_from_configuration() {
    let core: GatewayCore<Listing> =
        GatewayCore::from_config(CoreConfig::lightweight()).expect("preset is valid");

    assert_eq!(core.coordinator().pool().worker_count(), 2);
    assert_eq!(core.coordinator().cache().ttl(), CoreConfig::lightweight().cache.ttl);
    assert_eq!(core.health().config(), &CoreConfig::lightweight().health);
    assert_eq!(core.config(), &CoreConfig::lightweight());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn invalid_configuration_is_rejected() {
    let config = CoreConfig {
        pool: WorkerPoolConfig::new(0, 16),
        ..CoreConfig::lightweight()
    };

    let result = GatewayCore::<Listing>::from_config(config);

    assert!(matches!(result, Err(ConfigError::ZeroWorkers)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn request_path_and_health_path_share_one_core() {
    let core: GatewayCore<Listing> =
        GatewayCore::from_config(CoreConfig::lightweight()).expect("preset is valid");
    let counter = CallCounter::default();
    let token = CancellationToken::new();

    let fetched = core
        .coordinator()
        .fetch("pods:kube-system", &token, move || {
            list_pods(&counter, "kube-system")
        })
        .await
        .expect("fetch should succeed");
    core.health()
        .register(Arc::new(InMemoryHealthChecker::healthy(service("orchestrator"))));
    let overall = core.health().overall_health().await;

    assert_eq!(fetched.value.len(), 2);
    assert_eq!(overall.status(), HealthStatus::Healthy);
    assert_eq!(overall.message(), Some("all 1 services healthy"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn shutdown_drains_pool_and_clears_cache() {
    let core: GatewayCore<Listing> =
        GatewayCore::from_config(CoreConfig::lightweight()).expect("preset is valid");
    let token = CancellationToken::new();
    core.coordinator().cache().set("pods:default", vec!["api-0".to_owned()]);

    core.shutdown().await;

    assert!(core.coordinator().cache().is_empty());
    let result = core
        .coordinator()
        .fetch("pods:default", &token, || async {
            Ok::<Listing, io::Error>(Vec::new())
        })
        .await;
    assert!(matches!(
        result,
        Err(CoordinatorError::Pool(PoolError::ShutDown))
    ));
}
