//! Nodes known to the coordinator.

use crate::protocol::{NodeStatus, TASK_NODE_METADATA_KEY, TASK_NODE_METADATA_VALUE};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A node that announced itself to the coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownNode {
    name: String,
    host: String,
    port: u16,
    status: NodeStatus,
    metadata: BTreeMap<String, String>,
    registered_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedKnownNodeData {
    /// Persisted name.
    pub name: String,
    /// Persisted host.
    pub host: String,
    /// Persisted port.
    pub port: u16,
    /// Persisted status.
    pub status: NodeStatus,
    /// Persisted metadata.
    pub metadata: BTreeMap<String, String>,
    /// Persisted first registration timestamp.
    pub registered_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl KnownNode {
    /// Creates an online node.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        host: impl Into<String>,
        port: u16,
        metadata: BTreeMap<String, String>,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            name: name.into(),
            host: host.into(),
            port,
            status: NodeStatus::Online,
            metadata,
            registered_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a node from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedKnownNodeData) -> Self {
        Self {
            name: data.name,
            host: data.host,
            port: data.port,
            status: data.status,
            metadata: data.metadata,
            registered_at: data.registered_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the node name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the host used to reach the node.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the announced port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Returns the reported status.
    #[must_use]
    pub const fn status(&self) -> NodeStatus {
        self.status
    }

    /// Returns the node metadata.
    #[must_use]
    pub const fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }

    /// Returns the first registration timestamp.
    #[must_use]
    pub const fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns `true` when the node carries the task-node marker.
    #[must_use]
    pub fn is_task_node(&self) -> bool {
        self.metadata
            .get(TASK_NODE_METADATA_KEY)
            .is_some_and(|value| value == TASK_NODE_METADATA_VALUE)
    }

    /// Returns the base URL of a service the node runs on `port`.
    #[must_use]
    pub fn base_url(&self, port: u16) -> String {
        format!("http://{}:{port}", self.host)
    }

    /// Applies a repeated announcement, keeping the first registration time.
    pub fn refresh(
        &mut self,
        host: impl Into<String>,
        port: u16,
        metadata: BTreeMap<String, String>,
        clock: &impl Clock,
    ) {
        self.host = host.into();
        self.port = port;
        self.metadata = metadata;
        self.status = NodeStatus::Online;
        self.updated_at = clock.utc();
    }
}
