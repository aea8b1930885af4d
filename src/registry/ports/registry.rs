//! Repository port for task registrations and their run history.

use crate::registry::domain::{RegistrationId, RegistrationKey, TaskRegistration, TaskRunInfo};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for registry repository operations.
pub type TaskRegistryResult<T> = Result<T, TaskRegistryError>;

/// Result of an upsert call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertOutcome {
    /// The stored registration after the call.
    pub registration: TaskRegistration,
    /// `true` when this call created the record.
    pub created: bool,
}

/// Registration persistence contract.
#[async_trait]
pub trait TaskRegistryRepository: Send + Sync {
    /// Stores `candidate` under its key.
    ///
    /// When a record already exists it keeps its identifier and creation
    /// time, takes the candidate's endpoint, type and port, and returns to
    /// the pending state (see [`TaskRegistration::reregister`]).
    ///
    /// Concurrent calls for one key create at most one record; calls for
    /// different keys do not wait on each other.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRegistryError::Persistence`] on storage failure.
    async fn upsert(&self, candidate: TaskRegistration) -> TaskRegistryResult<UpsertOutcome>;

    /// Finds a registration by key.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRegistryError::Persistence`] on storage failure.
    async fn find(&self, key: &RegistrationKey) -> TaskRegistryResult<Option<TaskRegistration>>;

    /// Deletes a registration and its run history.
    ///
    /// Returns `false` when nothing was stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRegistryError::Persistence`] on storage failure.
    async fn remove(&self, key: &RegistrationKey) -> TaskRegistryResult<bool>;

    /// Deletes every registration of `node`, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRegistryError::Persistence`] on storage failure.
    async fn remove_for_node(&self, node: &str) -> TaskRegistryResult<usize>;

    /// Lists the registrations of `node` ordered by task name.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRegistryError::Persistence`] on storage failure.
    async fn list_for_node(&self, node: &str) -> TaskRegistryResult<Vec<TaskRegistration>>;

    /// Persists changes to an existing registration.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRegistryError::NotFound`] when the registration no
    /// longer exists.
    async fn update(&self, registration: &TaskRegistration) -> TaskRegistryResult<()>;

    /// Appends a run-info record.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRegistryError::NotFound`] when the referenced
    /// registration does not exist.
    async fn append_run_info(&self, run_info: &TaskRunInfo) -> TaskRegistryResult<()>;

    /// Lists the run history of a registration, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRegistryError::Persistence`] on storage failure.
    async fn list_run_info(&self, id: RegistrationId) -> TaskRegistryResult<Vec<TaskRunInfo>>;
}

/// Errors returned by registry repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRegistryError {
    /// The registration was not found.
    #[error("registration not found: {0}")]
    NotFound(RegistrationId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRegistryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
