//! JSON bodies exchanged between nodes and the coordinator.

use super::{NodeStatus, PayloadError};
use crate::descriptor::domain::TaskType;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Task registration sent by a node to [`super::REGISTER_TASK_PATH`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterTaskPayload {
    /// Name of the owning node.
    pub node: String,
    /// Task name, unique within the node.
    pub name: String,
    /// Declared task type.
    #[serde(rename = "type")]
    pub task_type: TaskType,
    /// Path of the task endpoint on the node.
    pub endpoint: String,
    /// Port the node serves task endpoints on.
    pub port: u16,
    /// Reported node status; `terminated` turns the payload into a
    /// deregistration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<NodeStatus>,
}

impl RegisterTaskPayload {
    /// Fields that must be present before any lookup happens.
    pub const REQUIRED_FIELDS: [&'static str; 5] = ["node", "name", "type", "endpoint", "port"];

    /// Context label used in payload errors.
    pub const CONTEXT: &'static str = "task registration";
}

/// Task deregistration sent by a node to [`super::REGISTER_TASK_PATH`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeregisterTaskPayload {
    /// Name of the owning node.
    pub node: String,
    /// Task name.
    pub name: String,
    /// Always [`NodeStatus::Terminated`] on the wire.
    pub status: NodeStatus,
}

impl DeregisterTaskPayload {
    /// Fields that must be present before any lookup happens.
    pub const REQUIRED_FIELDS: [&'static str; 2] = ["node", "name"];

    /// Context label used in payload errors.
    pub const CONTEXT: &'static str = "task deregistration";

    /// Creates a deregistration for one task.
    #[must_use]
    pub fn new(node: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            name: name.into(),
            status: NodeStatus::Terminated,
        }
    }
}

/// Node registration sent to [`super::REGISTER_NODE_PATH`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterNodePayload {
    /// Node name.
    pub name: String,
    /// Host the coordinator should use to reach the node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// Port the node serves task endpoints on.
    pub port: u16,
    /// Free-form node metadata such as `node.type`.
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    /// Reported node status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<NodeStatus>,
}

impl RegisterNodePayload {
    /// Fields that must be present before any lookup happens.
    pub const REQUIRED_FIELDS: [&'static str; 2] = ["name", "port"];

    /// Context label used in payload errors.
    pub const CONTEXT: &'static str = "node registration";
}

/// Node deregistration sent to [`super::REGISTER_NODE_PATH`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeregisterNodePayload {
    /// Node name.
    pub name: String,
    /// Always [`NodeStatus::Terminated`] on the wire.
    pub status: NodeStatus,
}

impl DeregisterNodePayload {
    /// Fields that must be present before any lookup happens.
    pub const REQUIRED_FIELDS: [&'static str; 1] = ["name"];

    /// Context label used in payload errors.
    pub const CONTEXT: &'static str = "node deregistration";

    /// Creates a deregistration for one node.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: NodeStatus::Terminated,
        }
    }
}

/// Execute request accepted by [`super::EXECUTE_TASK_PATH`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecuteTaskRequest {
    /// Target node name.
    pub node: String,
    /// Target task name.
    pub name: String,
    /// Opaque parameters forwarded to the node unchanged.
    pub parameters: Value,
}

impl ExecuteTaskRequest {
    /// Fields that must be present before any lookup happens.
    pub const REQUIRED_FIELDS: [&'static str; 3] = ["node", "name", "parameters"];

    /// Context label used in payload errors.
    pub const CONTEXT: &'static str = "task execution";
}

/// Plain acknowledgement body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    /// Whether the request was accepted.
    pub result: bool,
}

impl Ack {
    /// Successful acknowledgement.
    #[must_use]
    pub const fn ok() -> Self {
        Self { result: true }
    }
}

/// Acknowledgement returned for a task registration.
///
/// Extra keys are collected into `extensions` so nodes can keep whatever the
/// coordinator adds without interpreting it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationAck {
    /// Whether the registration was accepted.
    pub result: bool,
    /// Additional coordinator-provided keys.
    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

impl RegistrationAck {
    /// Successful acknowledgement without extensions.
    #[must_use]
    pub fn ok() -> Self {
        Self {
            result: true,
            extensions: Map::new(),
        }
    }
}

/// Acknowledgement returned for an accepted execute request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecuteAck {
    /// Always `true`; failures use [`ErrorBody`].
    pub result: bool,
    /// Identifier correlating later dispatch events with this request.
    pub dispatch_id: Uuid,
}

/// Error body returned for rejected requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Always `false`.
    pub result: bool,
    /// Human-readable reason.
    pub error: String,
}

impl ErrorBody {
    /// Creates an error body from any displayable reason.
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            result: false,
            error: error.into(),
        }
    }
}

/// Checks required fields, then deserializes `value` into `T`.
///
/// # Errors
///
/// Returns [`PayloadError::NotAnObject`] when `value` is not a JSON object,
/// [`PayloadError::MissingRequiredField`] listing every absent or null field,
/// or [`PayloadError::InvalidField`] when deserialization fails.
pub fn parse_payload<T: DeserializeOwned>(
    value: &Value,
    required: &[&str],
    context: &'static str,
) -> Result<T, PayloadError> {
    let Value::Object(fields) = value else {
        return Err(PayloadError::NotAnObject { context });
    };

    let missing: Vec<String> = required
        .iter()
        .filter(|field| fields.get(**field).is_none_or(Value::is_null))
        .map(|field| (*field).to_owned())
        .collect();
    if !missing.is_empty() {
        return Err(PayloadError::MissingRequiredField {
            context,
            fields: missing,
        });
    }

    serde_json::from_value(value.clone()).map_err(|err| PayloadError::InvalidField {
        context,
        reason: err.to_string(),
    })
}

/// Returns `true` when the payload carries the termination status marker.
#[must_use]
pub fn termination_requested(value: &Value) -> bool {
    value
        .get("status")
        .and_then(Value::as_str)
        .is_some_and(|status| status == NodeStatus::Terminated.as_str())
}
