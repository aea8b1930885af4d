//! Then steps for task dispatch BDD scenarios.

use super::world::{DispatchWorld, run_async};
use hivetasks::protocol::PayloadError;
use hivetasks::registry::services::{DispatchError, DispatchEvent, DispatchOutcome};
use rstest_bdd_macros::then;
use serde_json::json;
use std::time::Duration;

fn next_event(world: &mut DispatchWorld) -> Result<DispatchEvent, eyre::Report> {
    run_async(tokio::time::timeout(
        Duration::from_secs(2),
        world.events.recv(),
    ))
    .map_err(|_| eyre::eyre!("no dispatch event within two seconds"))?
    .map_err(|err| eyre::eyre!("dispatch events unavailable: {err}"))
}

fn last_error(world: &DispatchWorld) -> Result<&DispatchError, eyre::Report> {
    match world.last_execute_result.as_ref() {
        Some(Err(err)) => Ok(err),
        Some(Ok(ticket)) => Err(eyre::eyre!(
            "expected execute to fail, got dispatch {}",
            ticket.dispatch_id
        )),
        None => Err(eyre::eyre!("missing execute result in scenario world")),
    }
}

#[then("the execute request is accepted")]
fn execute_request_accepted(world: &mut DispatchWorld) -> Result<(), eyre::Report> {
    let ticket = match world.last_execute_result.as_ref() {
        Some(Ok(ticket)) => *ticket,
        Some(Err(err)) => return Err(eyre::eyre!("execute failed: {err}")),
        None => return Err(eyre::eyre!("missing execute result in scenario world")),
    };
    let event = next_event(world)?;
    if event.dispatch_id != ticket.dispatch_id {
        return Err(eyre::eyre!("event belongs to another dispatch"));
    }
    if !event.outcome.is_delivered() {
        return Err(eyre::eyre!("expected delivery, got {:?}", event.outcome));
    }
    Ok(())
}

#[then(r#"exactly one delivery reaches "{endpoint}" with an empty body"#)]
fn exactly_one_delivery(world: &DispatchWorld, endpoint: String) -> Result<(), eyre::Report> {
    let calls = world.forwarder.calls();
    let [call] = calls.as_slice() else {
        return Err(eyre::eyre!("expected one delivery, found {}", calls.len()));
    };
    if call.endpoint != endpoint {
        return Err(eyre::eyre!("delivery went to {}", call.endpoint));
    }
    if call.body != json!({}) {
        return Err(eyre::eyre!("unexpected delivery body {}", call.body));
    }
    Ok(())
}

#[then(r#"no task is registered for "{node}""#)]
fn no_task_registered(world: &DispatchWorld, node: String) -> Result<(), eyre::Report> {
    let listing = run_async(world.dispatcher.list_node_tasks())
        .map_err(|err| eyre::eyre!("listing failed: {err}"))?;
    let remaining: usize = listing
        .iter()
        .filter(|entry| entry.node.name() == node)
        .map(|entry| entry.tasks.len())
        .sum();
    if remaining != 0 || !world.registry.is_empty() {
        return Err(eyre::eyre!("{remaining} registrations remain for {node}"));
    }
    Ok(())
}

#[then("the execute request fails because the target is unknown")]
fn execute_fails_target_unknown(world: &DispatchWorld) -> Result<(), eyre::Report> {
    match last_error(world)? {
        DispatchError::TargetNotFound { .. } => Ok(()),
        other => Err(eyre::eyre!("expected unknown target, got {other}")),
    }
}

#[then("no delivery is made")]
fn no_delivery(world: &DispatchWorld) -> Result<(), eyre::Report> {
    let calls = world.forwarder.calls();
    if !calls.is_empty() {
        return Err(eyre::eyre!("expected no delivery, found {}", calls.len()));
    }
    Ok(())
}

#[then(r#"the execute request fails listing the missing field "{field}""#)]
fn execute_fails_missing_field(world: &DispatchWorld, field: String) -> Result<(), eyre::Report> {
    match last_error(world)? {
        DispatchError::Payload(payload @ PayloadError::MissingRequiredField { .. })
            if payload.missing_fields() == [field.as_str()] =>
        {
            Ok(())
        }
        other => Err(eyre::eyre!("expected missing {field}, got {other}")),
    }
}

#[then(r#"the dispatch of "{task}" on "{node}" is recorded as a delivery failure"#)]
fn dispatch_recorded_as_failure(
    world: &mut DispatchWorld,
    task: String,
    node: String,
) -> Result<(), eyre::Report> {
    let event = next_event(world)?;
    if !matches!(event.outcome, DispatchOutcome::DeliveryFailed { .. }) {
        return Err(eyre::eyre!("expected delivery failure, got {:?}", event.outcome));
    }
    let history = run_async(world.dispatcher.run_history(&node, &task))
        .map_err(|err| eyre::eyre!("history lookup failed: {err}"))?;
    let recorded = history
        .last()
        .and_then(|entry| entry.info())
        .and_then(|info| info.get("outcome"))
        .and_then(serde_json::Value::as_str);
    if recorded != Some("delivery_failed") {
        return Err(eyre::eyre!("run history does not record the failure: {recorded:?}"));
    }
    Ok(())
}
