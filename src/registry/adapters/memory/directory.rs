//! In-memory node directory.

use crate::registry::{
    domain::KnownNode,
    ports::{NodeDirectory, NodeDirectoryError, NodeDirectoryResult},
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory node directory ordered by node name.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNodeDirectory {
    nodes: Arc<RwLock<BTreeMap<String, KnownNode>>>,
}

impl InMemoryNodeDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> NodeDirectoryError {
    NodeDirectoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl NodeDirectory for InMemoryNodeDirectory {
    async fn upsert_node(&self, node: &KnownNode) -> NodeDirectoryResult<()> {
        let mut nodes = self.nodes.write().map_err(lock_error)?;
        nodes.insert(node.name().to_owned(), node.clone());
        Ok(())
    }

    async fn find_node(&self, name: &str) -> NodeDirectoryResult<Option<KnownNode>> {
        let nodes = self.nodes.read().map_err(lock_error)?;
        Ok(nodes.get(name).cloned())
    }

    async fn remove_node(&self, name: &str) -> NodeDirectoryResult<bool> {
        let mut nodes = self.nodes.write().map_err(lock_error)?;
        Ok(nodes.remove(name).is_some())
    }

    async fn list_with_metadata(
        &self,
        key: &str,
        value: &str,
    ) -> NodeDirectoryResult<Vec<KnownNode>> {
        let nodes = self.nodes.read().map_err(lock_error)?;
        Ok(nodes
            .values()
            .filter(|node| node.metadata().get(key).is_some_and(|found| found == value))
            .cloned()
            .collect())
    }
}
