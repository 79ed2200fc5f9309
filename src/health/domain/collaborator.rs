//! External collaborator kinds.

use super::ServiceName;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The infrastructure services the gateway fronts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollaboratorKind {
    /// Container orchestrator.
    Orchestrator,
    /// Backup controller.
    BackupController,
    /// Package manager.
    PackageManager,
    /// Object store.
    ObjectStore,
}

impl CollaboratorKind {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Orchestrator => "orchestrator",
            Self::BackupController => "backup_controller",
            Self::PackageManager => "package_manager",
            Self::ObjectStore => "object_store",
        }
    }

    /// Returns the default health checker name for this kind.
    #[must_use]
    pub fn service_name(self) -> ServiceName {
        ServiceName::from_trusted(self.as_str())
    }
}

impl fmt::Display for CollaboratorKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
