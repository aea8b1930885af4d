//! Port contracts of the task node.

mod coordinator;
mod runner;

pub use coordinator::{CoordinatorClient, CoordinatorClientError, CoordinatorClientResult};
pub use runner::{CommandOutcome, TaskRunReport, TaskRunner, TaskRunnerError};
