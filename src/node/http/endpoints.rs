//! Endpoint lookup table.

use crate::node::domain::Task;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Tasks keyed by their endpoint path.
#[derive(Debug, Clone, Default)]
pub struct EndpointTable {
    tasks: BTreeMap<String, Arc<Task>>,
}

impl EndpointTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Exposes `task` at its endpoint, replacing any previous task there.
    pub fn insert(&mut self, task: Arc<Task>) -> Option<Arc<Task>> {
        self.tasks.insert(task.endpoint(), task)
    }

    /// Finds the task exposed at `endpoint`.
    #[must_use]
    pub fn get(&self, endpoint: &str) -> Option<&Arc<Task>> {
        self.tasks.get(endpoint)
    }

    /// Returns the exposed endpoint paths in sorted order.
    pub fn endpoints(&self) -> impl Iterator<Item = &str> {
        self.tasks.keys().map(String::as_str)
    }

    /// Returns the number of exposed tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns `true` when no task is exposed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
