//! Adapter implementations of the health checker port.

pub mod memory;

mod collaborator;

pub use collaborator::CollaboratorHealthChecker;
