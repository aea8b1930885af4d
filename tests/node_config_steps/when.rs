//! When steps for task node BDD scenarios.

use super::world::{NodeWorld, run_async};
use hivetasks::node::http::EndpointTable;
use rstest_bdd_macros::when;

#[when("the node is constructed")]
fn node_is_constructed(world: &mut NodeWorld) -> Result<(), eyre::Report> {
    world.construct()
}

#[when("the node verifies its configuration")]
fn node_verifies_configuration(world: &mut NodeWorld) -> Result<(), eyre::Report> {
    let report = world
        .node_mut()?
        .verify_config()
        .map_err(|err| eyre::eyre!("validation could not run: {err}"))?;
    world.report = Some(report);
    Ok(())
}

#[when("the node registers its tasks")]
fn node_registers_tasks(world: &mut NodeWorld) -> Result<(), eyre::Report> {
    let node = world.node_mut()?;
    node.verify_config()
        .map_err(|err| eyre::eyre!("validation could not run: {err}"))?;
    let mut endpoints = EndpointTable::new();
    let summary = run_async(node.additional_registration(&mut endpoints))
        .map_err(|err| eyre::eyre!("registration could not run: {err}"))?;
    world.registration = Some(summary);
    Ok(())
}
