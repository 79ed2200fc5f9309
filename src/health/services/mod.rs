//! Application services for health aggregation.

mod registry;

pub use registry::{HealthRegistry, HealthRegistryConfig};
