//! Infragate: concurrency core of an infrastructure API gateway.
//!
//! The gateway fronts a container orchestrator, a backup controller, a
//! package manager, and an object store. This crate holds the parts every
//! request path shares:
//!
//! - [`cache`]: expiring key/value cache for collaborator responses
//! - [`worker_pool`]: bounded pool that runs collaborator calls
//! - [`coordinator`]: cache-first fetches scheduled on the pool
//! - [`health`]: per-collaborator health checks and aggregation
//! - [`gateway`]: explicit construction of all of the above
//!
//! Configuration lives in [`config`] and subscriber setup in [`telemetry`].
//!
//! # Architecture
//!
//! The health module follows hexagonal architecture principles:
//!
//! - **Domain**: Pure types with no infrastructure dependencies
//! - **Ports**: Trait interfaces for collaborators and checkers
//! - **Adapters**: Concrete checker implementations
//! - **Services**: The registry that runs and aggregates checks

pub mod cache;
pub mod config;
pub mod coordinator;
pub mod gateway;
pub mod health;
pub mod telemetry;
pub mod worker_pool;
