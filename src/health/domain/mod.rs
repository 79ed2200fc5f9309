//! Domain model for collaborator health.
//!
//! Health results are plain values: a service name, a coarse status, an
//! optional message and timing data. Nothing here performs I/O.

mod collaborator;
mod error;
mod name;
mod result;
mod status;

pub use collaborator::CollaboratorKind;
pub use error::{HealthDomainError, ParseHealthStatusError};
pub use name::{SYSTEM_SERVICE_NAME, ServiceName};
pub use result::HealthResult;
pub use status::HealthStatus;
