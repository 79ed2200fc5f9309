//! Given steps for health aggregation BDD scenarios.

use super::world::{HealthWorld, parse_service};
use infragate::health::adapters::memory::InMemoryHealthChecker;
use rstest_bdd_macros::given;
use std::sync::Arc;

#[given(r#"a healthy collaborator named "{name}""#)]
fn healthy_collaborator(world: &mut HealthWorld, name: String) -> Result<(), eyre::Report> {
    let service = parse_service(&name)?;
    world
        .registry
        .register(Arc::new(InMemoryHealthChecker::healthy(service)));
    Ok(())
}

#[given(r#"a collaborator named "{name}" failing with "{message}""#)]
fn failing_collaborator(
    world: &mut HealthWorld,
    name: String,
    message: String,
) -> Result<(), eyre::Report> {
    let service = parse_service(&name)?;
    world
        .registry
        .register(Arc::new(InMemoryHealthChecker::failing(service, message)));
    Ok(())
}
