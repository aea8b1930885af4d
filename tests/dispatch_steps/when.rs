//! When steps for task dispatch BDD scenarios.

use super::world::{DispatchWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::when;
use serde_json::json;

#[when(r#"a client executes "{task}" on "{node}" with empty parameters"#)]
fn client_executes_task(world: &mut DispatchWorld, task: String, node: String) {
    let body = json!({"node": node, "name": task, "parameters": {}});
    world.last_execute_result = Some(run_async(world.dispatcher.execute_task(&body)));
}

#[when(r#"a client submits an execute request for "{task}" on "{node}" without parameters"#)]
fn client_omits_parameters(world: &mut DispatchWorld, task: String, node: String) {
    let body = json!({"node": node, "name": task});
    world.last_execute_result = Some(run_async(world.dispatcher.execute_task(&body)));
}

#[when(r#"the node "{node}" deregisters the task "{task}""#)]
fn node_deregisters_task(
    world: &mut DispatchWorld,
    node: String,
    task: String,
) -> Result<(), eyre::Report> {
    let body = json!({"node": node, "name": task, "status": "terminated"});
    run_async(world.dispatcher.handle_task_registration(&body))
        .wrap_err("deregister task for scenario")?;
    Ok(())
}
