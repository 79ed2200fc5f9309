//! Error types for task submission and task outcomes.

use thiserror::Error;

/// Result type for pool submission.
pub type PoolResult<T> = Result<T, PoolError>;

/// Errors returned when a task cannot be queued.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum PoolError {
    /// The bounded queue is full and the caller asked not to wait.
    #[error("worker pool queue is full ({capacity} tasks pending)")]
    Saturated {
        /// Queue capacity that was exhausted.
        capacity: usize,
    },

    /// The pool no longer accepts work.
    #[error("worker pool has been shut down")]
    ShutDown,
}

/// Outcome of a job that did not produce a value.
#[derive(Debug, Error)]
pub enum TaskError<E> {
    /// The job returned an error; it is passed through unchanged.
    #[error(transparent)]
    Failed(E),

    /// The job panicked. The worker survived and carries on.
    #[error("task panicked: {0}")]
    Panicked(String),

    /// The job was dropped before it delivered an outcome.
    #[error("task was dropped before producing a result")]
    Abandoned,
}
