//! Forwarder that records deliveries instead of sending them.

use crate::registry::{
    domain::{KnownNode, TaskRegistration},
    ports::{ForwardReceipt, TaskForwardError, TaskForwarder},
};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::{Arc, RwLock};

/// A delivery received by [`RecordingTaskForwarder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardCall {
    /// Target node name.
    pub node: String,
    /// Endpoint path on the node.
    pub endpoint: String,
    /// Port the endpoint was registered on.
    pub port: u16,
    /// Body that would have been posted.
    pub body: Value,
}

/// Thread-safe forwarder keeping every delivery in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingTaskForwarder {
    state: Arc<RwLock<RecordingState>>,
}

#[derive(Debug, Default)]
struct RecordingState {
    calls: Vec<ForwardCall>,
    unreachable: HashSet<String>,
}

impl RecordingTaskForwarder {
    /// Creates a forwarder that delivers everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes deliveries to `node` fail as unreachable.
    pub fn set_unreachable(&self, node: impl Into<String>) {
        if let Ok(mut state) = self.state.write() {
            state.unreachable.insert(node.into());
        }
    }

    /// Returns the successful deliveries in order.
    #[must_use]
    pub fn calls(&self) -> Vec<ForwardCall> {
        self.state
            .read()
            .map(|state| state.calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TaskForwarder for RecordingTaskForwarder {
    async fn forward(
        &self,
        node: &KnownNode,
        registration: &TaskRegistration,
        parameters: &Value,
    ) -> Result<ForwardReceipt, TaskForwardError> {
        let mut state = self
            .state
            .write()
            .map_err(|err| TaskForwardError::Unreachable {
                node: node.name().to_owned(),
                reason: err.to_string(),
            })?;
        if state.unreachable.contains(node.name()) {
            return Err(TaskForwardError::Unreachable {
                node: node.name().to_owned(),
                reason: "connection refused".to_owned(),
            });
        }
        state.calls.push(ForwardCall {
            node: node.name().to_owned(),
            endpoint: registration.endpoint().to_owned(),
            port: registration.port(),
            body: parameters.clone(),
        });
        Ok(ForwardReceipt { status: 200 })
    }
}
