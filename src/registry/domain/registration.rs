//! Task registration aggregate.

use super::{ParseRegistrationStateError, RegistrationId};
use crate::descriptor::domain::TaskType;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Natural key of a registration: the owning node and the task name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RegistrationKey {
    /// Owning node name.
    pub node: String,
    /// Task name.
    pub name: String,
}

impl RegistrationKey {
    /// Creates a key.
    #[must_use]
    pub fn new(node: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RegistrationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.node, self.name)
    }
}

/// Dispatch state of a registration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationState {
    /// Registered; nothing dispatched yet.
    #[default]
    Pending,
    /// The last dispatch reached the node.
    Dispatched,
    /// The last dispatch could not reach the node.
    Unreachable,
}

impl RegistrationState {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Dispatched => "dispatched",
            Self::Unreachable => "unreachable",
        }
    }
}

impl TryFrom<&str> for RegistrationState {
    type Error = ParseRegistrationStateError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "dispatched" => Ok(Self::Dispatched),
            "unreachable" => Ok(Self::Unreachable),
            _ => Err(ParseRegistrationStateError(value.to_owned())),
        }
    }
}

impl fmt::Display for RegistrationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coordinator record of a task a node has announced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRegistration {
    id: RegistrationId,
    #[serde(flatten)]
    key: RegistrationKey,
    endpoint: String,
    task_type: TaskType,
    port: u16,
    state: RegistrationState,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskRegistrationData {
    /// Persisted identifier.
    pub id: RegistrationId,
    /// Persisted natural key.
    pub key: RegistrationKey,
    /// Persisted endpoint path.
    pub endpoint: String,
    /// Persisted task type.
    pub task_type: TaskType,
    /// Persisted endpoint port.
    pub port: u16,
    /// Persisted dispatch state.
    pub state: RegistrationState,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl TaskRegistration {
    /// Creates a pending registration.
    #[must_use]
    pub fn new(
        key: RegistrationKey,
        endpoint: impl Into<String>,
        task_type: TaskType,
        port: u16,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: RegistrationId::new(),
            key,
            endpoint: endpoint.into(),
            task_type,
            port,
            state: RegistrationState::Pending,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a registration from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskRegistrationData) -> Self {
        Self {
            id: data.id,
            key: data.key,
            endpoint: data.endpoint,
            task_type: data.task_type,
            port: data.port,
            state: data.state,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the identifier.
    #[must_use]
    pub const fn id(&self) -> RegistrationId {
        self.id
    }

    /// Returns the natural key.
    #[must_use]
    pub const fn key(&self) -> &RegistrationKey {
        &self.key
    }

    /// Returns the owning node name.
    #[must_use]
    pub fn node(&self) -> &str {
        &self.key.node
    }

    /// Returns the task name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.key.name
    }

    /// Returns the endpoint path on the node.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the task type.
    #[must_use]
    pub const fn task_type(&self) -> TaskType {
        self.task_type
    }

    /// Returns the port the endpoint is served on.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Returns the dispatch state.
    #[must_use]
    pub const fn state(&self) -> RegistrationState {
        self.state
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Takes over the routing details of `fresh`, a newer registration for
    /// the same key.
    ///
    /// Identity and creation time are kept; the state returns to
    /// [`RegistrationState::Pending`].
    pub fn reregister(&mut self, fresh: &Self) {
        self.endpoint.clone_from(&fresh.endpoint);
        self.task_type = fresh.task_type;
        self.port = fresh.port;
        self.state = RegistrationState::Pending;
        self.updated_at = fresh.updated_at;
    }

    /// Records the outcome of a dispatch.
    pub fn mark(&mut self, state: RegistrationState, clock: &impl Clock) {
        self.state = state;
        self.updated_at = clock.utc();
    }
}
