//! Then steps for task node BDD scenarios.

use super::world::NodeWorld;
use hivetasks::descriptor::validation::ValidationReport;
use hivetasks::node::domain::TaskNodeError;
use rstest_bdd_macros::then;

fn report(world: &NodeWorld) -> Result<&ValidationReport, eyre::Report> {
    world
        .report
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing validation report in scenario world"))
}

fn names(list: &str) -> Vec<String> {
    list.split(',').map(|name| name.trim().to_owned()).collect()
}

#[then("the configuration is valid")]
fn configuration_is_valid(world: &NodeWorld) -> Result<(), eyre::Report> {
    let validation = report(world)?;
    if !validation.is_valid() {
        return Err(eyre::eyre!(
            "expected a valid configuration, got {:?}",
            validation.error_messages()
        ));
    }
    Ok(())
}

#[then(r#"the node creates the tasks "{tasks}""#)]
fn node_creates_tasks(world: &mut NodeWorld, tasks: String) -> Result<(), eyre::Report> {
    let created: Vec<String> = world
        .node_mut()?
        .create_tasks()
        .map_err(|err| eyre::eyre!("task creation failed: {err}"))?
        .iter()
        .map(|task| task.name().to_owned())
        .collect();
    if created != names(&tasks) {
        return Err(eyre::eyre!("unexpected tasks {created:?}"));
    }
    Ok(())
}

#[then(r#"the configuration is invalid with the error "{message}""#)]
fn configuration_is_invalid(world: &NodeWorld, message: String) -> Result<(), eyre::Report> {
    let validation = report(world)?;
    if validation.is_valid() {
        return Err(eyre::eyre!("expected the configuration to be invalid"));
    }
    if validation.error_messages() != [message.as_str()] {
        return Err(eyre::eyre!(
            "unexpected errors {:?}",
            validation.error_messages()
        ));
    }
    Ok(())
}

#[then(r#"the coordinator received registrations for "{tasks}""#)]
fn coordinator_received_registrations(
    world: &NodeWorld,
    tasks: String,
) -> Result<(), eyre::Report> {
    let registered = world.coordinator.registered_tasks();
    if registered != names(&tasks) {
        return Err(eyre::eyre!("coordinator saw {registered:?}"));
    }
    Ok(())
}

#[then(r#"the task "{task}" is not registered"#)]
fn task_is_not_registered(world: &mut NodeWorld, task: String) -> Result<(), eyre::Report> {
    let summary = world
        .registration
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing registration summary in scenario world"))?;
    if !summary.failed.contains(&task) {
        return Err(eyre::eyre!("expected {task} among failed registrations"));
    }
    let registered = world
        .node_mut()?
        .registration_status(&task)
        .is_some_and(|status| status.is_registered());
    if registered {
        return Err(eyre::eyre!("{task} is marked as registered"));
    }
    Ok(())
}

#[then(r#"construction fails because the "{feature}" feature is disabled"#)]
fn construction_fails(world: &NodeWorld, feature: String) -> Result<(), eyre::Report> {
    match world.construct_error.as_ref() {
        Some(TaskNodeError::FeatureDisabled { feature: disabled }) if *disabled == feature => {
            Ok(())
        }
        Some(other) => Err(eyre::eyre!("unexpected construction error: {other}")),
        None => Err(eyre::eyre!("expected node construction to fail")),
    }
}
