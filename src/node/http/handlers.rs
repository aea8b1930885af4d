//! Axum router for task endpoints.

use super::EndpointTable;
use crate::node::ports::TaskRunner;
use crate::protocol::{Ack, ErrorBody, TASK_ROUTE, task_endpoint};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Shared state of the node router.
#[derive(Debug)]
pub struct NodeHttpState<R> {
    endpoints: EndpointTable,
    runner: Arc<R>,
}

impl<R> NodeHttpState<R> {
    /// Creates router state from exposed tasks and the runner executing them.
    #[must_use]
    pub const fn new(endpoints: EndpointTable, runner: Arc<R>) -> Self {
        Self { endpoints, runner }
    }

    /// Returns the exposed tasks.
    #[must_use]
    pub const fn endpoints(&self) -> &EndpointTable {
        &self.endpoints
    }
}

/// Builds the router serving every task endpoint.
pub fn router<R>(state: NodeHttpState<R>) -> Router
where
    R: TaskRunner + 'static,
{
    Router::new()
        .route(TASK_ROUTE, post(execute_task::<R>))
        .with_state(Arc::new(state))
}

async fn execute_task<R>(
    State(state): State<Arc<NodeHttpState<R>>>,
    Path((node, name)): Path<(String, String)>,
    Json(parameters): Json<Value>,
) -> Response
where
    R: TaskRunner + 'static,
{
    let endpoint = task_endpoint(&node, &name);
    let Some(task) = state.endpoints.get(&endpoint).cloned() else {
        warn!(%endpoint, "execute request for unknown task endpoint");
        return (
            StatusCode::NOT_FOUND,
            Json(ErrorBody::new(format!("no task exposed at {endpoint}"))),
        )
            .into_response();
    };

    info!(%endpoint, "task execution accepted");
    let runner = Arc::clone(&state.runner);
    tokio::spawn(async move {
        match runner.run(&task, parameters).await {
            Ok(report) => info!(
                task = task.name(),
                commands = report.commands.len(),
                "task execution finished"
            ),
            Err(err) => error!(task = task.name(), error = %err, "task execution failed"),
        }
    });

    Json(Ack::ok()).into_response()
}
