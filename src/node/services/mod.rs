//! Lifecycle orchestration of the task node.

mod task_node;

pub use task_node::{CallSummary, RunOutcome, TaskNode, TaskNodeOptions};
