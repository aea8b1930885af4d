//! Runtime representation of one invokable task.

use super::NodeIdentity;
use crate::descriptor::domain::{TaskConfig, TaskDefinition, TaskDescriptor, TaskType};
use crate::protocol::{
    DeregisterTaskPayload, NodeStatus, RegisterTaskPayload, RegistrationAck, task_endpoint,
};
use std::sync::Arc;

/// A configured task bound to the node that owns it.
///
/// A task can only be built from a [`NodeIdentity`], so its endpoint is
/// always derivable and stable.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    node: NodeIdentity,
    name: String,
    descriptor: TaskDescriptor,
    config: Arc<TaskConfig>,
}

impl Task {
    /// Binds a configured task definition to its node.
    #[must_use]
    pub fn new(node: NodeIdentity, definition: &TaskDefinition, config: Arc<TaskConfig>) -> Self {
        Self {
            node,
            name: definition.name().to_owned(),
            descriptor: definition.descriptor().clone(),
            config,
        }
    }

    /// Returns the owning node.
    #[must_use]
    pub const fn node(&self) -> &NodeIdentity {
        &self.node
    }

    /// Returns the task name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the task descriptor.
    #[must_use]
    pub const fn descriptor(&self) -> &TaskDescriptor {
        &self.descriptor
    }

    /// Returns the task type.
    #[must_use]
    pub const fn task_type(&self) -> TaskType {
        self.descriptor.task_type()
    }

    /// Returns the full configuration the task was built from.
    #[must_use]
    pub fn config(&self) -> &TaskConfig {
        &self.config
    }

    /// Returns the endpoint path, `/task/{node}/{task}`.
    #[must_use]
    pub fn endpoint(&self) -> String {
        task_endpoint(self.node.name(), &self.name)
    }

    /// Builds the registration payload announcing this task.
    #[must_use]
    pub fn to_registration(&self) -> RegisterTaskPayload {
        RegisterTaskPayload {
            node: self.node.name().to_owned(),
            name: self.name.clone(),
            task_type: self.task_type(),
            endpoint: self.endpoint(),
            port: self.node.port(),
            status: Some(NodeStatus::Online),
        }
    }

    /// Builds the deregistration payload withdrawing this task.
    #[must_use]
    pub fn to_deregistration(&self) -> DeregisterTaskPayload {
        DeregisterTaskPayload::new(self.node.name(), self.name.clone())
    }
}

/// Outcome of the most recent attempt to register a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationStatus {
    /// The coordinator accepted the registration.
    Registered(RegistrationAck),
    /// The registration call failed; the task is unknown to the coordinator.
    Failed(String),
}

impl RegistrationStatus {
    /// Returns `true` when the coordinator accepted the registration.
    #[must_use]
    pub const fn is_registered(&self) -> bool {
        matches!(self, Self::Registered(_))
    }
}
