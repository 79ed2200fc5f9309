//! Errors surfaced by coordinated fetches.

use crate::worker_pool::{PoolError, TaskError};
use thiserror::Error;

/// Reasons a [`RequestCoordinator::fetch`](super::RequestCoordinator::fetch)
/// produced no value.
#[derive(Debug, Error)]
pub enum CoordinatorError<E> {
    /// The request was cancelled before a result was available.
    #[error("request cancelled before a result was available")]
    Cancelled,

    /// The worker pool refused the job.
    #[error(transparent)]
    Pool(#[from] PoolError),

    /// The compute future failed; the error is passed through unchanged.
    #[error(transparent)]
    Compute(E),

    /// The compute future panicked on its worker.
    #[error("fetch panicked: {0}")]
    Panicked(String),

    /// The job was dropped before it produced an outcome.
    #[error("fetch was dropped before producing a result")]
    Abandoned,
}

impl<E> CoordinatorError<E> {
    /// Returns `true` for [`CoordinatorError::Cancelled`].
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl<E> From<TaskError<E>> for CoordinatorError<E> {
    fn from(err: TaskError<E>) -> Self {
        match err {
            TaskError::Failed(source) => Self::Compute(source),
            TaskError::Panicked(message) => Self::Panicked(message),
            TaskError::Abandoned => Self::Abandoned,
        }
    }
}
