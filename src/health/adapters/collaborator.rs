//! Health checker backed by a collaborator client.

use crate::health::{
    domain::ServiceName,
    ports::{Collaborator, HealthCheckError, HealthCheckResult, HealthChecker},
};
use async_trait::async_trait;
use std::sync::Arc;

/// Adapts any [`Collaborator`] into a [`HealthChecker`].
///
/// The checker is named after the collaborator kind unless an explicit name
/// is supplied, so a checker built from fresh credentials replaces the
/// previous registration for the same service.
#[derive(Debug)]
pub struct CollaboratorHealthChecker<C> {
    name: ServiceName,
    client: Arc<C>,
}

impl<C> CollaboratorHealthChecker<C>
where
    C: Collaborator,
{
    /// Creates a checker named after `client.kind()`.
    #[must_use]
    pub fn new(client: Arc<C>) -> Self {
        Self {
            name: client.kind().service_name(),
            client,
        }
    }

    /// Creates a checker registered under an explicit name.
    #[must_use]
    pub const fn with_name(name: ServiceName, client: Arc<C>) -> Self {
        Self { name, client }
    }

    /// Returns the wrapped client.
    #[must_use]
    pub const fn client(&self) -> &Arc<C> {
        &self.client
    }
}

#[async_trait]
impl<C> HealthChecker for CollaboratorHealthChecker<C>
where
    C: Collaborator,
{
    fn name(&self) -> &ServiceName {
        &self.name
    }

    async fn check(&self) -> HealthCheckResult {
        self.client
            .health_check()
            .await
            .map_err(HealthCheckError::collaborator)
    }
}
