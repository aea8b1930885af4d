//! Route constants and node status markers.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Coordinator route accepting task registration and deregistration.
pub const REGISTER_TASK_PATH: &str = "/register/task";

/// Coordinator route accepting node registration and deregistration.
pub const REGISTER_NODE_PATH: &str = "/register/node";

/// Coordinator route accepting execute requests.
pub const EXECUTE_TASK_PATH: &str = "/tasks/execute";

/// Coordinator management view listing task nodes and their tasks.
pub const LIST_TASKS_PATH: &str = "/tasks";

/// Machine-readable variant of [`LIST_TASKS_PATH`].
pub const LIST_TASKS_JSON_PATH: &str = "/tasks.json";

/// Path prefix under which nodes expose task endpoints.
pub const TASK_ROUTE_PREFIX: &str = "/task";

/// Axum route pattern matching every task endpoint on a node.
pub const TASK_ROUTE: &str = "/task/{node}/{name}";

/// Node metadata key identifying the kind of node.
pub const TASK_NODE_METADATA_KEY: &str = "node.type";

/// Value stored under [`TASK_NODE_METADATA_KEY`] by task nodes.
pub const TASK_NODE_METADATA_VALUE: &str = "tasknode";

/// Builds the execution endpoint path for a task on a node.
///
/// The path is deterministic, so two tasks of one node never collide as
/// long as their names differ.
#[must_use]
pub fn task_endpoint(node: &str, task: &str) -> String {
    format!("{TASK_ROUTE_PREFIX}/{node}/{task}")
}

/// Lifecycle status a node reports alongside registration payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
    /// The node is serving requests.
    Online,
    /// The node is going away; the payload is a deregistration.
    Terminated,
}

impl NodeStatus {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Terminated => "terminated",
        }
    }
}

impl TryFrom<&str> for NodeStatus {
    type Error = ParseNodeStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "online" => Ok(Self::Online),
            "terminated" => Ok(Self::Terminated),
            _ => Err(ParseNodeStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned while parsing node statuses from storage or the wire.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown node status: {0}")]
pub struct ParseNodeStatusError(pub String);
