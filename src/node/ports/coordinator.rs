//! Outbound calls from a node to the coordinator.

use crate::protocol::{
    Ack, DeregisterNodePayload, DeregisterTaskPayload, RegisterNodePayload, RegisterTaskPayload,
    RegistrationAck,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for coordinator client calls.
pub type CoordinatorClientResult<T> = Result<T, CoordinatorClientError>;

/// Client used by a node to announce itself and its tasks.
#[async_trait]
pub trait CoordinatorClient: Send + Sync {
    /// Announces the node.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinatorClientError`] when the call fails or is rejected.
    async fn register_node(&self, payload: &RegisterNodePayload) -> CoordinatorClientResult<Ack>;

    /// Withdraws the node.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinatorClientError`] when the call fails or is rejected.
    async fn deregister_node(
        &self,
        payload: &DeregisterNodePayload,
    ) -> CoordinatorClientResult<Ack>;

    /// Registers one task.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinatorClientError`] when the call fails or is rejected.
    async fn register_task(
        &self,
        payload: &RegisterTaskPayload,
    ) -> CoordinatorClientResult<RegistrationAck>;

    /// Deregisters one task.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinatorClientError`] when the call fails or is rejected.
    async fn deregister_task(
        &self,
        payload: &DeregisterTaskPayload,
    ) -> CoordinatorClientResult<Ack>;
}

/// Errors returned by coordinator clients.
#[derive(Debug, Clone, Error)]
pub enum CoordinatorClientError {
    /// The coordinator could not be reached.
    #[error("coordinator unreachable: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),

    /// The coordinator answered with an error status.
    #[error("coordinator rejected request with status {status}: {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Error text returned by the coordinator.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("invalid coordinator response: {0}")]
    Decode(String),
}

impl CoordinatorClientError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
