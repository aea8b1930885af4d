//! Shared world state for task node BDD scenarios.

use std::sync::Arc;

use hivetasks::descriptor::{domain::TaskConfigDocument, validation::ValidationReport};
use hivetasks::node::{
    adapters::memory::{RecordingCoordinatorClient, RecordingTaskRunner},
    domain::TaskNodeError,
    services::{CallSummary, TaskNode, TaskNodeOptions},
};
use hivetasks::settings::FeatureSet;
use rstest::fixture;

/// Node type used by the BDD world.
pub type TestNode = TaskNode<RecordingCoordinatorClient, RecordingTaskRunner>;

/// Named configurations scenarios can refer to.
pub const CONFIGURATIONS: [(&str, &str); 2] = [
    (
        "two tasks",
        "name: n\ntasks:\n  t1:\n    type: request\n    commands: [echo one]\n  t2:\n    type: cron\n    commands: [echo two]\n",
    ),
    (
        "unknown type",
        "name: n\ntasks:\n  t1:\n    type: bogus\n    commands: [echo one]\n",
    ),
];

/// Scenario world for task node behaviour tests.
pub struct NodeWorld {
    pub document: Option<TaskConfigDocument>,
    pub features: FeatureSet,
    pub coordinator: Arc<RecordingCoordinatorClient>,
    pub runner: Arc<RecordingTaskRunner>,
    pub node: Option<TestNode>,
    pub construct_error: Option<TaskNodeError>,
    pub report: Option<ValidationReport>,
    pub registration: Option<CallSummary>,
}

impl NodeWorld {
    /// Creates a world with every feature disabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            document: None,
            features: FeatureSet::default(),
            coordinator: Arc::new(RecordingCoordinatorClient::new()),
            runner: Arc::new(RecordingTaskRunner::new()),
            node: None,
            construct_error: None,
            report: None,
            registration: None,
        }
    }

    /// Builds the node from the pending document and features.
    pub fn construct(&mut self) -> Result<(), eyre::Report> {
        let document = self
            .document
            .take()
            .ok_or_else(|| eyre::eyre!("missing task configuration in scenario world"))?;
        match TaskNode::new(
            TaskNodeOptions::new(9999),
            document,
            &self.features,
            Arc::clone(&self.coordinator),
            Arc::clone(&self.runner),
        ) {
            Ok(node) => self.node = Some(node),
            Err(err) => self.construct_error = Some(err),
        }
        Ok(())
    }

    /// Returns the node, building it on first use.
    pub fn node_mut(&mut self) -> Result<&mut TestNode, eyre::Report> {
        if self.node.is_none() {
            self.construct()?;
        }
        match (self.node.as_mut(), self.construct_error.as_ref()) {
            (Some(node), _) => Ok(node),
            (None, Some(err)) => Err(eyre::eyre!("node construction failed: {err}")),
            (None, None) => Err(eyre::eyre!("node was not constructed")),
        }
    }
}

impl Default for NodeWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> NodeWorld {
    NodeWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
