//! Health checker port.

use crate::health::domain::ServiceName;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for a single health probe.
pub type HealthCheckResult = Result<(), HealthCheckError>;

/// A named capability that reports whether one collaborator is reachable
/// and answering correctly.
///
/// Implementations do not need their own timeout: the registry bounds every
/// call to [`HealthChecker::check`].
#[async_trait]
pub trait HealthChecker: Send + Sync {
    /// Returns the name the checker is registered under.
    fn name(&self) -> &ServiceName;

    /// Probes the collaborator once.
    async fn check(&self) -> HealthCheckResult;
}

/// Errors reported by health checkers.
///
/// The registry stores the display text of the error as the result message.
#[derive(Debug, Clone, Error)]
pub enum HealthCheckError {
    /// The collaborator answered but reported itself unhealthy.
    #[error("{0}")]
    Unhealthy(String),

    /// The collaborator call failed.
    #[error(transparent)]
    Collaborator(Arc<dyn std::error::Error + Send + Sync>),
}

impl HealthCheckError {
    /// Creates an [`HealthCheckError::Unhealthy`] error.
    #[must_use]
    pub fn unhealthy(message: impl Into<String>) -> Self {
        Self::Unhealthy(message.into())
    }

    /// Wraps an error raised by a collaborator client.
    #[must_use]
    pub fn collaborator(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Collaborator(Arc::new(err))
    }
}
