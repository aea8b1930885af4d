//! Execution of a task's commands on the node.

use crate::node::domain::Task;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Result of one command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandOutcome {
    /// Command text as configured.
    pub command: String,
    /// Exit code, absent when the process was killed by a signal.
    pub exit_code: Option<i32>,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

impl CommandOutcome {
    /// Returns `true` when the command exited with status zero.
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        matches!(self.exit_code, Some(0))
    }
}

/// Result of running every command of a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskRunReport {
    /// Task that ran.
    pub task: String,
    /// Outcomes in execution order.
    pub commands: Vec<CommandOutcome>,
}

/// Runs a task with the parameters delivered by the coordinator.
#[async_trait]
pub trait TaskRunner: Send + Sync {
    /// Runs `task` with opaque `parameters`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRunnerError`] when a command cannot be started or
    /// exits unsuccessfully.
    async fn run(&self, task: &Task, parameters: Value) -> Result<TaskRunReport, TaskRunnerError>;
}

/// Errors returned by task runners.
#[derive(Debug, Clone, Error)]
pub enum TaskRunnerError {
    /// A command could not be started.
    #[error("failed to start command {command:?}: {source}")]
    Spawn {
        /// Command text.
        command: String,
        /// Underlying failure.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// A command exited unsuccessfully; later commands were skipped.
    #[error("command {command:?} failed with exit code {code:?}: {stderr}")]
    CommandFailed {
        /// Command text.
        command: String,
        /// Exit code, absent when killed by a signal.
        code: Option<i32>,
        /// Captured standard error.
        stderr: String,
    },
}
