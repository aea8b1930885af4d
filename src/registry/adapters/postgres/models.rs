//! Diesel row models for registry persistence.

use super::schema::{known_nodes, task_registrations, task_run_info};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Row of `known_nodes`.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = known_nodes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct KnownNodeRow {
    /// Node name.
    pub name: String,
    /// Host used to reach the node.
    pub host: String,
    /// Announced port.
    pub port: i32,
    /// Reported status.
    pub status: String,
    /// Metadata JSON object.
    pub metadata: Value,
    /// First registration timestamp.
    pub registered_at: DateTime<Utc>,
    /// Latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Row of `task_registrations`.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = task_registrations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RegistrationRow {
    /// Registration identifier.
    pub id: uuid::Uuid,
    /// Owning node name.
    pub node_name: String,
    /// Task name.
    pub name: String,
    /// Endpoint path.
    pub endpoint: String,
    /// Task type.
    pub task_type: String,
    /// Endpoint port.
    pub port: i32,
    /// Dispatch state.
    pub state: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Row of `task_run_info`.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = task_run_info)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RunInfoRow {
    /// Record identifier.
    pub id: uuid::Uuid,
    /// Referenced registration.
    pub registration_id: uuid::Uuid,
    /// Opaque run payload.
    pub info: Option<Value>,
    /// Write timestamp.
    pub recorded_at: DateTime<Utc>,
}
