//! `PostgreSQL` registration store.

use super::{
    models::{RegistrationRow, RunInfoRow},
    schema::{task_registrations, task_run_info},
};
use crate::descriptor::domain::TaskType;
use crate::registry::{
    domain::{
        PersistedTaskRegistrationData, RegistrationId, RegistrationKey, RegistrationState,
        RunInfoId, TaskRegistration, TaskRunInfo,
    },
    ports::{TaskRegistryError, TaskRegistryRepository, TaskRegistryResult, UpsertOutcome},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::upsert::excluded;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by registry adapters.
pub type RegistryPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed registration store.
#[derive(Debug, Clone)]
pub struct PostgresTaskRegistry {
    pool: RegistryPgPool,
}

impl PostgresTaskRegistry {
    /// Creates a store from a connection pool.
    #[must_use]
    pub const fn new(pool: RegistryPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRegistryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRegistryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRegistryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRegistryError::persistence)?
    }
}

#[async_trait]
impl TaskRegistryRepository for PostgresTaskRegistry {
    async fn upsert(&self, candidate: TaskRegistration) -> TaskRegistryResult<UpsertOutcome> {
        let new_row = to_row(&candidate);
        self.run_blocking(move |connection| {
            let stored = diesel::insert_into(task_registrations::table)
                .values(&new_row)
                .on_conflict((task_registrations::node_name, task_registrations::name))
                .do_update()
                .set((
                    task_registrations::endpoint.eq(excluded(task_registrations::endpoint)),
                    task_registrations::task_type.eq(excluded(task_registrations::task_type)),
                    task_registrations::port.eq(excluded(task_registrations::port)),
                    task_registrations::state.eq(excluded(task_registrations::state)),
                    task_registrations::updated_at.eq(excluded(task_registrations::updated_at)),
                ))
                .returning(RegistrationRow::as_returning())
                .get_result::<RegistrationRow>(connection)
                .map_err(TaskRegistryError::persistence)?;

            // A conflicting row keeps its own id.
            let created = stored.id == new_row.id;
            Ok(UpsertOutcome {
                registration: row_to_registration(stored)?,
                created,
            })
        })
        .await
    }

    async fn find(&self, key: &RegistrationKey) -> TaskRegistryResult<Option<TaskRegistration>> {
        let lookup = key.clone();
        self.run_blocking(move |connection| {
            let row = task_registrations::table
                .filter(task_registrations::node_name.eq(&lookup.node))
                .filter(task_registrations::name.eq(&lookup.name))
                .select(RegistrationRow::as_select())
                .first::<RegistrationRow>(connection)
                .optional()
                .map_err(TaskRegistryError::persistence)?;
            row.map(row_to_registration).transpose()
        })
        .await
    }

    async fn remove(&self, key: &RegistrationKey) -> TaskRegistryResult<bool> {
        let lookup = key.clone();
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(
                task_registrations::table
                    .filter(task_registrations::node_name.eq(&lookup.node))
                    .filter(task_registrations::name.eq(&lookup.name)),
            )
            .execute(connection)
            .map_err(TaskRegistryError::persistence)?;
            Ok(deleted > 0)
        })
        .await
    }

    async fn remove_for_node(&self, node: &str) -> TaskRegistryResult<usize> {
        let node_name = node.to_owned();
        self.run_blocking(move |connection| {
            diesel::delete(
                task_registrations::table.filter(task_registrations::node_name.eq(&node_name)),
            )
            .execute(connection)
            .map_err(TaskRegistryError::persistence)
        })
        .await
    }

    async fn list_for_node(&self, node: &str) -> TaskRegistryResult<Vec<TaskRegistration>> {
        let node_name = node.to_owned();
        self.run_blocking(move |connection| {
            task_registrations::table
                .filter(task_registrations::node_name.eq(&node_name))
                .order(task_registrations::name.asc())
                .select(RegistrationRow::as_select())
                .load::<RegistrationRow>(connection)
                .map_err(TaskRegistryError::persistence)?
                .into_iter()
                .map(row_to_registration)
                .collect()
        })
        .await
    }

    async fn update(&self, registration: &TaskRegistration) -> TaskRegistryResult<()> {
        let row = to_row(registration);
        let id = registration.id();
        self.run_blocking(move |connection| {
            let updated = diesel::update(task_registrations::table.find(row.id))
                .set((
                    task_registrations::endpoint.eq(&row.endpoint),
                    task_registrations::task_type.eq(&row.task_type),
                    task_registrations::port.eq(row.port),
                    task_registrations::state.eq(&row.state),
                    task_registrations::updated_at.eq(row.updated_at),
                ))
                .execute(connection)
                .map_err(TaskRegistryError::persistence)?;
            if updated == 0 {
                return Err(TaskRegistryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn append_run_info(&self, run_info: &TaskRunInfo) -> TaskRegistryResult<()> {
        let registration_id = run_info.registration_id();
        let row = RunInfoRow {
            id: run_info.id().into_inner(),
            registration_id: registration_id.into_inner(),
            info: run_info.info().cloned(),
            recorded_at: run_info.recorded_at(),
        };
        self.run_blocking(move |connection| {
            diesel::insert_into(task_run_info::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                        TaskRegistryError::NotFound(registration_id)
                    }
                    _ => TaskRegistryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn list_run_info(&self, id: RegistrationId) -> TaskRegistryResult<Vec<TaskRunInfo>> {
        self.run_blocking(move |connection| {
            let rows = task_run_info::table
                .filter(task_run_info::registration_id.eq(id.into_inner()))
                .order(task_run_info::recorded_at.asc())
                .select(RunInfoRow::as_select())
                .load::<RunInfoRow>(connection)
                .map_err(TaskRegistryError::persistence)?;
            Ok(rows
                .into_iter()
                .map(|row| {
                    TaskRunInfo::from_persisted(
                        RunInfoId::from_uuid(row.id),
                        RegistrationId::from_uuid(row.registration_id),
                        row.info,
                        row.recorded_at,
                    )
                })
                .collect())
        })
        .await
    }
}

fn to_row(registration: &TaskRegistration) -> RegistrationRow {
    RegistrationRow {
        id: registration.id().into_inner(),
        node_name: registration.node().to_owned(),
        name: registration.name().to_owned(),
        endpoint: registration.endpoint().to_owned(),
        task_type: registration.task_type().as_str().to_owned(),
        port: i32::from(registration.port()),
        state: registration.state().as_str().to_owned(),
        created_at: registration.created_at(),
        updated_at: registration.updated_at(),
    }
}

fn row_to_registration(row: RegistrationRow) -> TaskRegistryResult<TaskRegistration> {
    let task_type =
        TaskType::try_from(row.task_type.as_str()).map_err(TaskRegistryError::persistence)?;
    let state =
        RegistrationState::try_from(row.state.as_str()).map_err(TaskRegistryError::persistence)?;
    let port = u16::try_from(row.port).map_err(TaskRegistryError::persistence)?;

    Ok(TaskRegistration::from_persisted(
        PersistedTaskRegistrationData {
            id: RegistrationId::from_uuid(row.id),
            key: RegistrationKey::new(row.node_name, row.name),
            endpoint: row.endpoint,
            task_type,
            port,
            state,
            created_at: row.created_at,
            updated_at: row.updated_at,
        },
    ))
}
