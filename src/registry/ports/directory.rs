//! Directory port for known nodes.

use crate::registry::domain::KnownNode;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for node directory operations.
pub type NodeDirectoryResult<T> = Result<T, NodeDirectoryError>;

/// Known-node persistence contract.
#[async_trait]
pub trait NodeDirectory: Send + Sync {
    /// Inserts or replaces the node stored under its name.
    ///
    /// # Errors
    ///
    /// Returns [`NodeDirectoryError::Persistence`] on storage failure.
    async fn upsert_node(&self, node: &KnownNode) -> NodeDirectoryResult<()>;

    /// Finds a node by name.
    ///
    /// # Errors
    ///
    /// Returns [`NodeDirectoryError::Persistence`] on storage failure.
    async fn find_node(&self, name: &str) -> NodeDirectoryResult<Option<KnownNode>>;

    /// Removes a node, returning `false` when it was unknown.
    ///
    /// # Errors
    ///
    /// Returns [`NodeDirectoryError::Persistence`] on storage failure.
    async fn remove_node(&self, name: &str) -> NodeDirectoryResult<bool>;

    /// Lists nodes whose metadata maps `key` to `value`, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns [`NodeDirectoryError::Persistence`] on storage failure.
    async fn list_with_metadata(&self, key: &str, value: &str)
    -> NodeDirectoryResult<Vec<KnownNode>>;
}

/// Errors returned by node directory implementations.
#[derive(Debug, Clone, Error)]
pub enum NodeDirectoryError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl NodeDirectoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
