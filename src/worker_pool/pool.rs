//! Worker pool implementation.

use super::task::panic_message;
use super::{PoolError, PoolResult, Task, TaskError, TaskHandle, TaskId};
use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Worker pool sizing.
///
/// # Examples
///
/// ```
/// use infragate::worker_pool::WorkerPoolConfig;
///
/// let config = WorkerPoolConfig::default();
/// assert_eq!(config.workers, 10);
///
/// let small = WorkerPoolConfig::new(2, 8);
/// assert_eq!(small.queue_capacity, 8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerPoolConfig {
    /// Number of long-lived workers, and so the concurrency limit.
    pub workers: usize,
    /// Number of tasks the queue holds before submission waits.
    pub queue_capacity: usize,
}

impl WorkerPoolConfig {
    /// Creates a configuration with explicit sizes.
    #[must_use]
    pub const fn new(workers: usize, queue_capacity: usize) -> Self {
        Self {
            workers,
            queue_capacity,
        }
    }
}

impl Default for WorkerPoolConfig {
    fn default() -> Self {
        Self {
            workers: 10,
            queue_capacity: 100,
        }
    }
}

/// Fixed-size pool of workers draining a shared bounded queue.
///
/// Cloning yields another handle onto the same pool.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    shared: Arc<PoolShared>,
}

#[derive(Debug)]
struct PoolShared {
    sender: Mutex<Option<mpsc::Sender<Task>>>,
    workers: AsyncMutex<Vec<JoinHandle<()>>>,
    active: Arc<AtomicUsize>,
    config: WorkerPoolConfig,
}

impl PoolShared {
    fn lock_sender(&self) -> MutexGuard<'_, Option<mpsc::Sender<Task>>> {
        self.sender.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl WorkerPool {
    /// Starts a pool with `config.workers` workers.
    ///
    /// Zero sizes are raised to one.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    #[must_use]
    pub fn new(config: WorkerPoolConfig) -> Self {
        let sized = WorkerPoolConfig::new(config.workers.max(1), config.queue_capacity.max(1));
        let (sender, receiver) = mpsc::channel::<Task>(sized.queue_capacity);
        let queue = Arc::new(AsyncMutex::new(receiver));
        let active = Arc::new(AtomicUsize::new(0));

        let workers = (0..sized.workers)
            .map(|index| {
                tokio::spawn(run_worker(
                    index,
                    Arc::clone(&queue),
                    Arc::clone(&active),
                ))
            })
            .collect();

        info!(
            workers = sized.workers,
            queue_capacity = sized.queue_capacity,
            "worker pool started"
        );

        Self {
            shared: Arc::new(PoolShared {
                sender: Mutex::new(Some(sender)),
                workers: AsyncMutex::new(workers),
                active,
                config: sized,
            }),
        }
    }

    /// Returns the number of workers.
    #[must_use]
    pub fn worker_count(&self) -> usize {
        self.shared.config.workers
    }

    /// Returns the queue capacity.
    #[must_use]
    pub fn queue_capacity(&self) -> usize {
        self.shared.config.queue_capacity
    }

    /// Returns the number of tasks executing right now.
    #[must_use]
    pub fn active_tasks(&self) -> usize {
        self.shared.active.load(Ordering::SeqCst)
    }

    /// Enqueues `task`, waiting for a free queue slot if necessary.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::ShutDown`] once the pool has been shut down.
    pub async fn submit<F>(&self, task: F) -> PoolResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let sender = self.sender()?;
        sender
            .send(task.boxed())
            .await
            .map_err(|_| PoolError::ShutDown)
    }

    /// Enqueues `task` without waiting.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Saturated`] when the queue is full, or
    /// [`PoolError::ShutDown`] once the pool has been shut down.
    pub fn try_submit<F>(&self, task: F) -> PoolResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let sender = self.sender()?;
        sender.try_send(task.boxed()).map_err(|err| match err {
            mpsc::error::TrySendError::Full(_) => {
                warn!(
                    capacity = self.queue_capacity(),
                    "worker pool saturated; task rejected"
                );
                PoolError::Saturated {
                    capacity: self.queue_capacity(),
                }
            }
            mpsc::error::TrySendError::Closed(_) => PoolError::ShutDown,
        })
    }

    /// Runs a fallible job on the pool and returns a handle to its outcome.
    ///
    /// Waits for a queue slot when the queue is full.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::ShutDown`] once the pool has been shut down.
    pub async fn execute<J, Fut, T, E>(&self, job: J) -> PoolResult<TaskHandle<T, E>>
    where
        J: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        let (task, handle) = wrap_job(job);
        self.submit(task).await?;
        Ok(handle)
    }

    /// Runs a fallible job on the pool without waiting for a queue slot.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Saturated`] when the queue is full, or
    /// [`PoolError::ShutDown`] once the pool has been shut down.
    pub fn try_execute<J, Fut, T, E>(&self, job: J) -> PoolResult<TaskHandle<T, E>>
    where
        J: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        let (task, handle) = wrap_job(job);
        self.try_submit(task)?;
        Ok(handle)
    }

    /// Stops accepting work, drains the queue, and waits for every worker
    /// to exit.
    ///
    /// Every caller, including concurrent and repeated ones, returns only
    /// after the queue has been drained.
    pub async fn shutdown(&self) {
        drop(self.shared.lock_sender().take());
        let mut workers = self.shared.workers.lock().await;
        if workers.is_empty() {
            return;
        }
        for joined in futures::future::join_all(workers.drain(..)).await {
            if let Err(err) = joined {
                error!(error = %err, "worker exited abnormally");
            }
        }
        info!("worker pool shut down");
    }

    fn sender(&self) -> PoolResult<mpsc::Sender<Task>> {
        self.shared.lock_sender().clone().ok_or(PoolError::ShutDown)
    }
}

fn wrap_job<J, Fut, T, E>(job: J) -> (Task, TaskHandle<T, E>)
where
    J: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    let id = TaskId::new();
    let (sender, receiver) = oneshot::channel();
    let task = async move {
        let outcome = match AssertUnwindSafe(async move { job().await })
            .catch_unwind()
            .await
        {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => Err(TaskError::Failed(err)),
            Err(payload) => {
                let message = panic_message(&*payload);
                error!(task = %id, panic = %message, "task panicked");
                Err(TaskError::Panicked(message))
            }
        };
        if sender.send(outcome).is_err() {
            debug!(task = %id, "task outcome discarded; caller stopped waiting");
        }
    };
    (task.boxed(), TaskHandle::new(id, receiver))
}

async fn run_worker(
    index: usize,
    queue: Arc<AsyncMutex<mpsc::Receiver<Task>>>,
    active: Arc<AtomicUsize>,
) {
    debug!(worker = index, "worker started");
    loop {
        let next = queue.lock().await.recv().await;
        let Some(task) = next else {
            break;
        };
        active.fetch_add(1, Ordering::SeqCst);
        if let Err(payload) = AssertUnwindSafe(task).catch_unwind().await {
            error!(
                worker = index,
                panic = %panic_message(&*payload),
                "submitted task panicked"
            );
        }
        active.fetch_sub(1, Ordering::SeqCst);
    }
    debug!(worker = index, "worker stopped");
}
