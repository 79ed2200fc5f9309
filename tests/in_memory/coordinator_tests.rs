//! In-memory integration tests for cache-first coordinated fetches.

use super::helpers::{CallCounter, Listing, TEST_TTL, coordinator, list_pods};
use infragate::cache::{CacheKey, TtlCache};
use infragate::coordinator::{CoordinatorError, RequestCoordinator};
use infragate::worker_pool::{PoolError, WorkerPool, WorkerPoolConfig};
use rstest::rstest;
use std::io;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

fn crash_client() -> io::Result<Listing> {
    panic!("kube client crashed");
}

fn pods_key() -> String {
    CacheKey::compose(["pods", "default"]).into()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn miss_then_hit_calls_collaborator_once() {
    let coordinator = coordinator();
    let counter = CallCounter::default();
    let token = CancellationToken::new();

    let first_counter = counter.clone();
    let first = coordinator
        .fetch(&pods_key(), &token, move || list_pods(&first_counter, "default"))
        .await
        .expect("first fetch should succeed");
    let second_counter = counter.clone();
    let second = coordinator
        .fetch(&pods_key(), &token, move || list_pods(&second_counter, "default"))
        .await
        .expect("second fetch should succeed");

    assert!(!first.cache_hit);
    assert!(second.cache_hit);
    assert_eq!(first.value, second.value);
    assert_eq!(counter.count(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn compute_error_is_returned_and_not_cached() {
    let coordinator = coordinator();
    let token = CancellationToken::new();

    let result = coordinator
        .fetch(&pods_key(), &token, || async {
            Err::<Listing, _>(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "pods is forbidden",
            ))
        })
        .await;

    let err = match result {
        Err(CoordinatorError::Compute(err)) => err,
        other => panic!("expected compute error, got {other:?}"),
    };
    assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
    assert_eq!(err.to_string(), "pods is forbidden");
    assert!(coordinator.cache().get(&pods_key()).is_none());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cancelled_token_short_circuits_without_work() {
    let coordinator = coordinator();
    let counter = CallCounter::default();
    let token = CancellationToken::new();
    token.cancel();

    let job_counter = counter.clone();
    let result = coordinator
        .fetch(&pods_key(), &token, move || list_pods(&job_counter, "default"))
        .await;

    assert!(matches!(result, Err(CoordinatorError::Cancelled)));
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(counter.count(), 0);
    assert!(coordinator.cache().is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn result_finished_after_cancellation_is_still_cached() {
    let coordinator = coordinator();
    let token = CancellationToken::new();
    let (release_tx, release_rx) = oneshot::channel::<()>();

    let waiting = {
        let fetcher = coordinator.clone();
        let request_token = token.clone();
        tokio::spawn(async move {
            fetcher
                .fetch(&pods_key(), &request_token, move || async move {
                    release_rx.await.ok();
                    Ok::<Listing, io::Error>(vec!["default/api-0".to_owned()])
                })
                .await
        })
    };

    tokio::time::sleep(Duration::from_millis(20)).await;
    token.cancel();
    let outcome = waiting.await.expect("fetch task should join");
    assert!(matches!(outcome, Err(CoordinatorError::Cancelled)));

    release_tx.send(()).expect("job still waiting for release");
    let mut cached = None;
    for _ in 0..50 {
        cached = coordinator.cache().get(&pods_key());
        if cached.is_some() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(cached, Some(vec!["default/api-0".to_owned()]));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cancellation_while_queue_is_full_skips_the_job() {
    let pool = WorkerPool::new(WorkerPoolConfig::new(1, 1));
    let coordinator = RequestCoordinator::<Listing>::new(TtlCache::new(TEST_TTL), pool.clone());
    let counter = CallCounter::default();
    let token = CancellationToken::new();
    let (started_tx, started_rx) = oneshot::channel::<()>();
    let (release_tx, release_rx) = oneshot::channel::<()>();

    pool.submit(async move {
        started_tx.send(()).ok();
        release_rx.await.ok();
    })
    .await
    .expect("blocker should be queued");
    started_rx.await.expect("worker should pick up the blocker");
    pool.try_submit(async {}).expect("one queue slot is free");

    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        canceller.cancel();
    });
    let job_counter = counter.clone();
    let result = coordinator
        .fetch(&pods_key(), &token, move || list_pods(&job_counter, "default"))
        .await;

    assert!(matches!(result, Err(CoordinatorError::Cancelled)));
    release_tx.send(()).expect("blocker still waiting for release");
    pool.shutdown().await;
    assert_eq!(counter.count(), 0);
    assert!(coordinator.cache().is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn panicking_compute_is_reported() {
    let coordinator = coordinator();
    let token = CancellationToken::new();

    let result = coordinator
        .fetch(&pods_key(), &token, || async { crash_client() })
        .await;

    assert!(matches!(
        result,
        Err(CoordinatorError::Panicked(ref message)) if message == "kube client crashed"
    ));
    assert!(coordinator.cache().is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn pool_shutdown_rejects_new_fetches() {
    let coordinator: RequestCoordinator<Listing> = coordinator();
    let token = CancellationToken::new();
    coordinator.pool().shutdown().await;

    let result = coordinator
        .fetch(&pods_key(), &token, || async { Ok::<Listing, io::Error>(Vec::new()) })
        .await;

    assert!(matches!(
        result,
        Err(CoordinatorError::Pool(PoolError::ShutDown))
    ));
}

#[rstest]
#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn expired_entry_is_recomputed() {
    let coordinator = coordinator();
    let counter = CallCounter::default();
    let token = CancellationToken::new();

    let first_counter = counter.clone();
    coordinator
        .fetch(&pods_key(), &token, move || list_pods(&first_counter, "default"))
        .await
        .expect("first fetch should succeed");

    tokio::time::advance(TEST_TTL + Duration::from_secs(1)).await;

    let second_counter = counter.clone();
    let refreshed = coordinator
        .fetch(&pods_key(), &token, move || list_pods(&second_counter, "default"))
        .await
        .expect("refetch should succeed");

    assert!(!refreshed.cache_hit);
    assert_eq!(counter.count(), 2);
}
