//! `PostgreSQL` node directory.

use super::{models::KnownNodeRow, registry::RegistryPgPool, schema::known_nodes};
use crate::protocol::NodeStatus;
use crate::registry::{
    domain::{KnownNode, PersistedKnownNodeData},
    ports::{NodeDirectory, NodeDirectoryError, NodeDirectoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::upsert::excluded;
use std::collections::BTreeMap;

/// `PostgreSQL`-backed node directory.
#[derive(Debug, Clone)]
pub struct PostgresNodeDirectory {
    pool: RegistryPgPool,
}

impl PostgresNodeDirectory {
    /// Creates a directory from a connection pool.
    #[must_use]
    pub const fn new(pool: RegistryPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> NodeDirectoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> NodeDirectoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(NodeDirectoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(NodeDirectoryError::persistence)?
    }
}

#[async_trait]
impl NodeDirectory for PostgresNodeDirectory {
    async fn upsert_node(&self, node: &KnownNode) -> NodeDirectoryResult<()> {
        let row = to_row(node)?;
        self.run_blocking(move |connection| {
            diesel::insert_into(known_nodes::table)
                .values(&row)
                .on_conflict(known_nodes::name)
                .do_update()
                .set((
                    known_nodes::host.eq(excluded(known_nodes::host)),
                    known_nodes::port.eq(excluded(known_nodes::port)),
                    known_nodes::status.eq(excluded(known_nodes::status)),
                    known_nodes::metadata.eq(excluded(known_nodes::metadata)),
                    known_nodes::updated_at.eq(excluded(known_nodes::updated_at)),
                ))
                .execute(connection)
                .map_err(NodeDirectoryError::persistence)?;
            Ok(())
        })
        .await
    }

    async fn find_node(&self, name: &str) -> NodeDirectoryResult<Option<KnownNode>> {
        let lookup = name.to_owned();
        self.run_blocking(move |connection| {
            let row = known_nodes::table
                .find(&lookup)
                .select(KnownNodeRow::as_select())
                .first::<KnownNodeRow>(connection)
                .optional()
                .map_err(NodeDirectoryError::persistence)?;
            row.map(row_to_node).transpose()
        })
        .await
    }

    async fn remove_node(&self, name: &str) -> NodeDirectoryResult<bool> {
        let lookup = name.to_owned();
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(known_nodes::table.find(&lookup))
                .execute(connection)
                .map_err(NodeDirectoryError::persistence)?;
            Ok(deleted > 0)
        })
        .await
    }

    async fn list_with_metadata(
        &self,
        key: &str,
        value: &str,
    ) -> NodeDirectoryResult<Vec<KnownNode>> {
        let (wanted_key, wanted_value) = (key.to_owned(), value.to_owned());
        self.run_blocking(move |connection| {
            let rows = known_nodes::table
                .order(known_nodes::name.asc())
                .select(KnownNodeRow::as_select())
                .load::<KnownNodeRow>(connection)
                .map_err(NodeDirectoryError::persistence)?;
            let mut nodes = Vec::with_capacity(rows.len());
            for row in rows {
                let node = row_to_node(row)?;
                if node
                    .metadata()
                    .get(&wanted_key)
                    .is_some_and(|found| *found == wanted_value)
                {
                    nodes.push(node);
                }
            }
            Ok(nodes)
        })
        .await
    }
}

fn to_row(node: &KnownNode) -> NodeDirectoryResult<KnownNodeRow> {
    let metadata = serde_json::to_value(node.metadata()).map_err(NodeDirectoryError::persistence)?;
    Ok(KnownNodeRow {
        name: node.name().to_owned(),
        host: node.host().to_owned(),
        port: i32::from(node.port()),
        status: node.status().as_str().to_owned(),
        metadata,
        registered_at: node.registered_at(),
        updated_at: node.updated_at(),
    })
}

fn row_to_node(row: KnownNodeRow) -> NodeDirectoryResult<KnownNode> {
    let status = NodeStatus::try_from(row.status.as_str()).map_err(NodeDirectoryError::persistence)?;
    let port = u16::try_from(row.port).map_err(NodeDirectoryError::persistence)?;
    let metadata = serde_json::from_value::<BTreeMap<String, String>>(row.metadata)
        .map_err(NodeDirectoryError::persistence)?;

    Ok(KnownNode::from_persisted(PersistedKnownNodeData {
        name: row.name,
        host: row.host,
        port,
        status,
        metadata,
        registered_at: row.registered_at,
        updated_at: row.updated_at,
    }))
}
