//! Bounded worker pool for running collaborator calls off the request path.
//!
//! A [`WorkerPool`] owns a fixed number of long-lived Tokio tasks draining a
//! shared bounded queue. At most `workers` submitted tasks run at once.
//!
//! # Backpressure
//!
//! The queue holds `queue_capacity` tasks. [`WorkerPool::submit`] and
//! [`WorkerPool::execute`] wait for a free slot when it is full, so callers
//! bound that wait with their own cancellation. [`WorkerPool::try_submit`]
//! and [`WorkerPool::try_execute`] never wait and fail with
//! [`PoolError::Saturated`] instead.
//!
//! # Shutdown
//!
//! [`WorkerPool::shutdown`] drains: it refuses new work, lets the workers
//! finish everything already queued, then joins them. Dropping every handle
//! to the pool closes the queue the same way without waiting.
//!
//! # Result delivery
//!
//! The pool itself is fire-and-forget. [`WorkerPool::execute`] wraps a
//! fallible job so that exactly one outcome is delivered on the returned
//! [`TaskHandle`], including a recovered panic.

mod error;
mod pool;
mod task;

pub use error::{PoolError, PoolResult, TaskError};
pub use pool::{WorkerPool, WorkerPoolConfig};
pub use task::{Task, TaskHandle, TaskId};

pub(crate) use task::panic_message;
