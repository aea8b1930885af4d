//! Given steps for task node BDD scenarios.

use super::world::{CONFIGURATIONS, NodeWorld};
use eyre::WrapErr;
use hivetasks::descriptor::domain::TaskConfigDocument;
use hivetasks::settings::TASKS_FEATURE;
use rstest_bdd_macros::given;

#[given(r#"the task configuration "{name}""#)]
fn task_configuration(world: &mut NodeWorld, name: String) -> Result<(), eyre::Report> {
    let yaml = CONFIGURATIONS
        .iter()
        .find_map(|(label, yaml)| (*label == name).then_some(*yaml))
        .ok_or_else(|| eyre::eyre!("no configuration named {name}"))?;
    world.document =
        Some(TaskConfigDocument::from_yaml_str(yaml).wrap_err("parse scenario configuration")?);
    Ok(())
}

#[given("the tasks feature is enabled")]
fn tasks_feature_enabled(world: &mut NodeWorld) {
    world.features.enable(TASKS_FEATURE);
}

#[given(r#"the coordinator rejects the task "{task}""#)]
fn coordinator_rejects_task(world: &mut NodeWorld, task: String) {
    world.coordinator.fail_task(task);
}
