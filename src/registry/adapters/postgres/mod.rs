//! `PostgreSQL` adapters for the coordinator registry.
//!
//! Tables are created by
//! `migrations/2026-10-01-000000_create_task_tables/up.sql`.

mod directory;
mod models;
mod registry;
mod schema;

pub use directory::PostgresNodeDirectory;
pub use registry::{PostgresTaskRegistry, RegistryPgPool};

/// SQL creating the registry tables, for deployments without a migration
/// runner.
pub const CREATE_TABLES_SQL: &str =
    include_str!("../../../../migrations/2026-10-01-000000_create_task_tables/up.sql");
