//! Task runner that records runs instead of executing commands.

use crate::node::domain::Task;
use crate::node::ports::{TaskRunReport, TaskRunner, TaskRunnerError};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::time::Instant;

/// A run received by [`RecordingTaskRunner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRun {
    /// Owning node name.
    pub node: String,
    /// Task name.
    pub task: String,
    /// Parameters delivered with the run.
    pub parameters: Value,
}

/// Thread-safe runner that keeps every run in arrival order.
#[derive(Debug, Clone, Default)]
pub struct RecordingTaskRunner {
    runs: Arc<RwLock<Vec<RecordedRun>>>,
}

impl RecordingTaskRunner {
    /// Creates an empty runner.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded runs.
    #[must_use]
    pub fn runs(&self) -> Vec<RecordedRun> {
        self.runs
            .read()
            .map(|runs| runs.clone())
            .unwrap_or_default()
    }

    /// Waits until at least `count` runs were recorded or `timeout` elapses,
    /// then returns whatever was recorded.
    pub async fn wait_for_runs(&self, count: usize, timeout: Duration) -> Vec<RecordedRun> {
        let deadline = Instant::now() + timeout;
        loop {
            let runs = self.runs();
            if runs.len() >= count || Instant::now() >= deadline {
                return runs;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

#[async_trait]
impl TaskRunner for RecordingTaskRunner {
    async fn run(&self, task: &Task, parameters: Value) -> Result<TaskRunReport, TaskRunnerError> {
        if let Ok(mut runs) = self.runs.write() {
            runs.push(RecordedRun {
                node: task.node().name().to_owned(),
                task: task.name().to_owned(),
                parameters,
            });
        }
        Ok(TaskRunReport {
            task: task.name().to_owned(),
            commands: Vec::new(),
        })
    }
}
