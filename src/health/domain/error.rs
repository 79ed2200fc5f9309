//! Error types for health domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing health domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HealthDomainError {
    /// The service name is empty after trimming.
    #[error("service name must not be empty")]
    EmptyServiceName,

    /// The service name contains characters outside `[a-z0-9_.-]`.
    #[error(
        "service name '{0}' contains invalid characters (only lowercase alphanumeric, '_', '-' and '.' allowed)"
    )]
    InvalidServiceName(String),

    /// The service name exceeds the 100-character limit.
    #[error("service name exceeds 100 character limit: {0}")]
    ServiceNameTooLong(String),
}

/// Error returned while parsing a health status string.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown health status: {0}")]
pub struct ParseHealthStatusError(pub String);
