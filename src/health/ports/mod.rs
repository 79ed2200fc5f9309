//! Port contracts for health checking.

mod checker;
mod collaborator;

pub use checker::{HealthCheckError, HealthCheckResult, HealthChecker};
pub use collaborator::{Collaborator, CollaboratorError, CollaboratorResult};
