//! Axum router for the coordinator API.

use super::{ApiError, render_task_listing};
use crate::protocol::{
    Ack, EXECUTE_TASK_PATH, ExecuteAck, LIST_TASKS_JSON_PATH, LIST_TASKS_PATH, REGISTER_NODE_PATH,
    REGISTER_TASK_PATH, RegistrationAck,
};
use crate::registry::{
    ports::{NodeDirectory, TaskForwarder, TaskRegistryRepository},
    services::{NodeTasks, TaskDispatcher},
};
use axum::{
    Json, Router,
    extract::State,
    response::Html,
    routing::{get, post},
};
use mockable::Clock;
use serde_json::Value;
use std::sync::Arc;

type SharedDispatcher<R, D, F, C> = State<Arc<TaskDispatcher<R, D, F, C>>>;

/// Builds the coordinator router around a shared dispatcher.
pub fn router<R, D, F, C>(dispatcher: Arc<TaskDispatcher<R, D, F, C>>) -> Router
where
    R: TaskRegistryRepository + 'static,
    D: NodeDirectory + 'static,
    F: TaskForwarder + 'static,
    C: Clock + Send + Sync + 'static,
{
    Router::new()
        .route(REGISTER_TASK_PATH, post(register_task::<R, D, F, C>))
        .route(REGISTER_NODE_PATH, post(register_node::<R, D, F, C>))
        .route(EXECUTE_TASK_PATH, post(execute_task::<R, D, F, C>))
        .route(LIST_TASKS_PATH, get(list_tasks_html::<R, D, F, C>))
        .route(LIST_TASKS_JSON_PATH, get(list_tasks_json::<R, D, F, C>))
        .with_state(dispatcher)
}

async fn register_task<R, D, F, C>(
    State(dispatcher): SharedDispatcher<R, D, F, C>,
    Json(body): Json<Value>,
) -> Result<Json<RegistrationAck>, ApiError>
where
    R: TaskRegistryRepository + 'static,
    D: NodeDirectory + 'static,
    F: TaskForwarder + 'static,
    C: Clock + Send + Sync + 'static,
{
    Ok(Json(dispatcher.handle_task_registration(&body).await?))
}

async fn register_node<R, D, F, C>(
    State(dispatcher): SharedDispatcher<R, D, F, C>,
    Json(body): Json<Value>,
) -> Result<Json<Ack>, ApiError>
where
    R: TaskRegistryRepository + 'static,
    D: NodeDirectory + 'static,
    F: TaskForwarder + 'static,
    C: Clock + Send + Sync + 'static,
{
    Ok(Json(dispatcher.handle_node_registration(&body).await?))
}

async fn execute_task<R, D, F, C>(
    State(dispatcher): SharedDispatcher<R, D, F, C>,
    Json(body): Json<Value>,
) -> Result<Json<ExecuteAck>, ApiError>
where
    R: TaskRegistryRepository + 'static,
    D: NodeDirectory + 'static,
    F: TaskForwarder + 'static,
    C: Clock + Send + Sync + 'static,
{
    let ticket = dispatcher.execute_task(&body).await?;
    Ok(Json(ExecuteAck {
        result: true,
        dispatch_id: ticket.dispatch_id,
    }))
}

async fn list_tasks_html<R, D, F, C>(
    State(dispatcher): SharedDispatcher<R, D, F, C>,
) -> Result<Html<String>, ApiError>
where
    R: TaskRegistryRepository + 'static,
    D: NodeDirectory + 'static,
    F: TaskForwarder + 'static,
    C: Clock + Send + Sync + 'static,
{
    let listing = dispatcher.list_node_tasks().await?;
    Ok(Html(render_task_listing(&listing)?))
}

async fn list_tasks_json<R, D, F, C>(
    State(dispatcher): SharedDispatcher<R, D, F, C>,
) -> Result<Json<Vec<NodeTasks>>, ApiError>
where
    R: TaskRegistryRepository + 'static,
    D: NodeDirectory + 'static,
    F: TaskForwarder + 'static,
    C: Clock + Send + Sync + 'static,
{
    Ok(Json(dispatcher.list_node_tasks().await?))
}
