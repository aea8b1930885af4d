//! Coordinator client that records calls instead of sending them.

use crate::node::ports::{CoordinatorClient, CoordinatorClientError, CoordinatorClientResult};
use crate::protocol::{
    Ack, DeregisterNodePayload, DeregisterTaskPayload, RegisterNodePayload, RegisterTaskPayload,
    RegistrationAck,
};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, RwLock};

/// A call received by [`RecordingCoordinatorClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoordinatorCall {
    /// Node registration.
    RegisterNode(RegisterNodePayload),
    /// Node deregistration.
    DeregisterNode(DeregisterNodePayload),
    /// Task registration.
    RegisterTask(RegisterTaskPayload),
    /// Task deregistration.
    DeregisterTask(DeregisterTaskPayload),
}

/// Thread-safe coordinator client that keeps every call in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingCoordinatorClient {
    state: Arc<RwLock<RecordingState>>,
}

#[derive(Debug, Default)]
struct RecordingState {
    calls: Vec<CoordinatorCall>,
    failing_tasks: HashSet<String>,
    unreachable: bool,
}

impl RecordingCoordinatorClient {
    /// Creates a client that accepts every call.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes registration and deregistration of `task` fail.
    pub fn fail_task(&self, task: impl Into<String>) {
        if let Ok(mut state) = self.state.write() {
            state.failing_tasks.insert(task.into());
        }
    }

    /// Makes every call fail as if the coordinator were down.
    pub fn set_unreachable(&self, unreachable: bool) {
        if let Ok(mut state) = self.state.write() {
            state.unreachable = unreachable;
        }
    }

    /// Returns the recorded calls in order.
    #[must_use]
    pub fn calls(&self) -> Vec<CoordinatorCall> {
        self.state
            .read()
            .map(|state| state.calls.clone())
            .unwrap_or_default()
    }

    /// Returns the names of tasks whose registration was attempted.
    #[must_use]
    pub fn registered_tasks(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                CoordinatorCall::RegisterTask(payload) => Some(payload.name),
                _ => None,
            })
            .collect()
    }

    /// Returns the names of tasks whose deregistration was attempted.
    #[must_use]
    pub fn deregistered_tasks(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                CoordinatorCall::DeregisterTask(payload) => Some(payload.name),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: CoordinatorCall, task: Option<&str>) -> CoordinatorClientResult<()> {
        let mut state = self.state.write().map_err(|err| {
            CoordinatorClientError::transport(std::io::Error::other(err.to_string()))
        })?;
        if state.unreachable {
            return Err(CoordinatorClientError::transport(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "coordinator unreachable",
            )));
        }
        state.calls.push(call);
        match task {
            Some(name) if state.failing_tasks.contains(name) => {
                Err(CoordinatorClientError::Rejected {
                    status: 500,
                    message: format!("rejected task {name}"),
                })
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl CoordinatorClient for RecordingCoordinatorClient {
    async fn register_node(&self, payload: &RegisterNodePayload) -> CoordinatorClientResult<Ack> {
        self.record(CoordinatorCall::RegisterNode(payload.clone()), None)?;
        Ok(Ack::ok())
    }

    async fn deregister_node(
        &self,
        payload: &DeregisterNodePayload,
    ) -> CoordinatorClientResult<Ack> {
        self.record(CoordinatorCall::DeregisterNode(payload.clone()), None)?;
        Ok(Ack::ok())
    }

    async fn register_task(
        &self,
        payload: &RegisterTaskPayload,
    ) -> CoordinatorClientResult<RegistrationAck> {
        self.record(
            CoordinatorCall::RegisterTask(payload.clone()),
            Some(&payload.name),
        )?;
        Ok(RegistrationAck::ok())
    }

    async fn deregister_task(
        &self,
        payload: &DeregisterTaskPayload,
    ) -> CoordinatorClientResult<Ack> {
        self.record(
            CoordinatorCall::DeregisterTask(payload.clone()),
            Some(&payload.name),
        )?;
        Ok(Ack::ok())
    }
}
