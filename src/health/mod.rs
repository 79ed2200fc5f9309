//! Health aggregation across external collaborators.
//!
//! Request handlers register one [`HealthChecker`](ports::HealthChecker)
//! per collaborator once it has answered a direct probe. The
//! [`HealthRegistry`](services::HealthRegistry) then fans checks out on
//! demand, bounds each by a timeout, and keeps the last result per service
//! name. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - The registry service in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
