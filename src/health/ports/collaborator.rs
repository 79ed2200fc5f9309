//! Uniform contract exposed by external collaborator clients.

use crate::health::domain::CollaboratorKind;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for collaborator calls.
pub type CollaboratorResult<T> = Result<T, CollaboratorError>;

/// A client for one external infrastructure service, built from a
/// request's credentials.
#[async_trait]
pub trait Collaborator: Send + Sync {
    /// Returns which service this client talks to.
    fn kind(&self) -> CollaboratorKind;

    /// Performs the service's own liveness call.
    async fn health_check(&self) -> CollaboratorResult<()>;
}

/// Errors returned by collaborator clients.
#[derive(Debug, Clone, Error)]
pub enum CollaboratorError {
    /// The service could not be reached.
    #[error("{kind} unreachable: {reason}")]
    Unreachable {
        /// Collaborator kind.
        kind: CollaboratorKind,
        /// Transport-level reason.
        reason: String,
    },

    /// The service rejected the supplied credentials.
    #[error("{0} rejected the supplied credentials")]
    Unauthorized(CollaboratorKind),

    /// Any other client failure.
    #[error("{kind} client error: {source}")]
    Client {
        /// Collaborator kind.
        kind: CollaboratorKind,
        /// Underlying client error.
        source: Arc<dyn std::error::Error + Send + Sync>,
    },
}

impl CollaboratorError {
    /// Wraps a client library error.
    #[must_use]
    pub fn client(
        kind: CollaboratorKind,
        err: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Client {
            kind,
            source: Arc::new(err),
        }
    }
}
