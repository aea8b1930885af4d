//! Delivery of execute requests to nodes.

use crate::registry::domain::{KnownNode, TaskRegistration};
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Acknowledgement of a delivered execute request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForwardReceipt {
    /// HTTP status returned by the node.
    pub status: u16,
}

/// Sends task parameters to the endpoint of a registration.
#[async_trait]
pub trait TaskForwarder: Send + Sync {
    /// Posts `parameters` to the registration's endpoint on `node`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskForwardError::Unreachable`] when the node cannot be
    /// reached and [`TaskForwardError::Rejected`] when it answers with an
    /// error status.
    async fn forward(
        &self,
        node: &KnownNode,
        registration: &TaskRegistration,
        parameters: &Value,
    ) -> Result<ForwardReceipt, TaskForwardError>;
}

/// Errors returned by task forwarders.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskForwardError {
    /// The node could not be reached.
    #[error("node {node} unreachable: {reason}")]
    Unreachable {
        /// Node name.
        node: String,
        /// Transport failure description.
        reason: String,
    },

    /// The node answered with an error status.
    #[error("node {node} rejected the request with status {status}")]
    Rejected {
        /// Node name.
        node: String,
        /// HTTP status code.
        status: u16,
    },
}
