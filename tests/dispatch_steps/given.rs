//! Given steps for task dispatch BDD scenarios.

use super::world::{DispatchWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use serde_json::json;

#[given(r#"a task node "{node}" is known to the coordinator"#)]
fn task_node_is_known(world: &mut DispatchWorld, node: String) -> Result<(), eyre::Report> {
    let body = json!({
        "name": node,
        "host": "127.0.0.1",
        "port": 9999,
        "metadata": {"node.type": "tasknode"},
    });
    run_async(world.dispatcher.handle_node_registration(&body))
        .wrap_err("register node for scenario")?;
    Ok(())
}

#[given(r#"the node "{node}" registered the request task "{task}""#)]
fn node_registered_task(
    world: &mut DispatchWorld,
    node: String,
    task: String,
) -> Result<(), eyre::Report> {
    let body = json!({
        "node": node,
        "name": task,
        "type": "request",
        "endpoint": format!("/task/{node}/{task}"),
        "port": 9999,
        "status": "online",
    });
    run_async(world.dispatcher.handle_task_registration(&body))
        .wrap_err("register task for scenario")?;
    Ok(())
}

#[given(r#"the node "{node}" cannot be reached"#)]
fn node_cannot_be_reached(world: &mut DispatchWorld, node: String) {
    world.forwarder.set_unreachable(node);
}
