//! Read-only identity of the node that owns a task.

use super::TaskNodeError;
use crate::descriptor::domain::is_route_safe;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Host advertised when none is configured.
pub const DEFAULT_NODE_HOST: &str = "127.0.0.1";

/// Name and address of a task node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeIdentity {
    name: String,
    host: String,
    port: u16,
}

impl NodeIdentity {
    /// Creates a validated node identity.
    ///
    /// # Errors
    ///
    /// Returns [`TaskNodeError::InvalidNodeName`] when the name cannot be
    /// used as an endpoint path segment.
    pub fn new(
        name: impl Into<String>,
        host: impl Into<String>,
        port: u16,
    ) -> Result<Self, TaskNodeError> {
        let name = name.into();
        if !is_route_safe(&name) {
            return Err(TaskNodeError::InvalidNodeName(name));
        }
        Ok(Self {
            name,
            host: host.into(),
            port,
        })
    }

    /// Returns the node name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the advertised host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the port task endpoints are served on.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for NodeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}:{}", self.name, self.host, self.port)
    }
}
