//! When steps for health aggregation BDD scenarios.

use super::world::{HealthWorld, parse_service, run_async};
use rstest_bdd_macros::when;

#[when("overall health is evaluated")]
fn evaluate_overall(world: &mut HealthWorld) {
    world.last_overall = Some(run_async(world.registry.overall_health()));
}

#[when(r#""{name}" is checked"#)]
fn check_one(world: &mut HealthWorld, name: String) -> Result<(), eyre::Report> {
    let service = parse_service(&name)?;
    world.last_single = Some(run_async(world.registry.check_single(&service)));
    Ok(())
}
