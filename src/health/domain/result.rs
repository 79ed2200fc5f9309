//! Timestamped health check result.

use super::{HealthStatus, ServiceName};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Outcome of one health check, as cached by the registry and returned to
/// callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResult {
    name: ServiceName,
    status: HealthStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    checked_at: DateTime<Utc>,
    duration_ms: u64,
}

impl HealthResult {
    /// Creates a result with the given status and no message.
    #[must_use]
    pub const fn new(name: ServiceName, status: HealthStatus, checked_at: DateTime<Utc>) -> Self {
        Self {
            name,
            status,
            message: None,
            checked_at,
            duration_ms: 0,
        }
    }

    /// Creates a `healthy` result.
    #[must_use]
    pub const fn healthy(name: ServiceName, checked_at: DateTime<Utc>) -> Self {
        Self::new(name, HealthStatus::Healthy, checked_at)
    }

    /// Creates an `unhealthy` result carrying the failure text verbatim.
    #[must_use]
    pub fn unhealthy(
        name: ServiceName,
        checked_at: DateTime<Utc>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::new(name, HealthStatus::Unhealthy, checked_at)
        }
    }

    /// Creates the `unknown` result returned for unregistered names.
    #[must_use]
    pub fn unknown(name: ServiceName, checked_at: DateTime<Utc>) -> Self {
        Self::new(name, HealthStatus::Unknown, checked_at)
            .with_message("no health checker registered")
    }

    /// Adds an explanatory message. Blank messages are ignored.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        let normalized = message.into().trim().to_owned();
        if !normalized.is_empty() {
            self.message = Some(normalized);
        }
        self
    }

    /// Records how long the check took, saturating at `u64::MAX` ms.
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Returns the service name.
    #[must_use]
    pub const fn name(&self) -> &ServiceName {
        &self.name
    }

    /// Returns the health status.
    #[must_use]
    pub const fn status(&self) -> HealthStatus {
        self.status
    }

    /// Returns the optional detail message.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns when the check completed.
    #[must_use]
    pub const fn checked_at(&self) -> DateTime<Utc> {
        self.checked_at
    }

    /// Returns how long the check took, in milliseconds.
    #[must_use]
    pub const fn duration_ms(&self) -> u64 {
        self.duration_ms
    }
}
