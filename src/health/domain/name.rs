//! Validated service names.

use super::HealthDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length for a service name.
const MAX_SERVICE_NAME_LENGTH: usize = 100;

/// Name of the synthetic result produced by overall health evaluation.
pub const SYSTEM_SERVICE_NAME: &str = "system";

/// Name under which a health checker is registered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceName(String);

impl ServiceName {
    /// Creates a validated service name.
    ///
    /// The input is trimmed and lowercased. Only characters in
    /// `[a-z0-9_.-]` are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`HealthDomainError`] when validation fails.
    pub fn new(value: impl Into<String>) -> Result<Self, HealthDomainError> {
        let normalized = value.into().trim().to_ascii_lowercase();

        if normalized.is_empty() {
            return Err(HealthDomainError::EmptyServiceName);
        }

        let is_valid = normalized.chars().all(|character| {
            character.is_ascii_lowercase()
                || character.is_ascii_digit()
                || matches!(character, '_' | '-' | '.')
        });
        if !is_valid {
            return Err(HealthDomainError::InvalidServiceName(normalized));
        }

        if normalized.len() > MAX_SERVICE_NAME_LENGTH {
            return Err(HealthDomainError::ServiceNameTooLong(normalized));
        }

        Ok(Self(normalized))
    }

    /// Returns the name used for the aggregated system result.
    #[must_use]
    pub fn system() -> Self {
        Self::from_trusted(SYSTEM_SERVICE_NAME)
    }

    /// Wraps a compile-time name already known to satisfy validation.
    pub(crate) fn from_trusted(value: &'static str) -> Self {
        Self(value.to_owned())
    }

    /// Returns the service name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ServiceName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
