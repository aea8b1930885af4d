//! `DashMap`-backed registration store.
//!
//! Upserts go through the map's entry API, which locks only the shard
//! holding the key. A run-history slot exists exactly as long as its
//! registration, so appending is a single locked lookup.

use crate::registry::{
    domain::{RegistrationId, RegistrationKey, TaskRegistration, TaskRunInfo},
    ports::{TaskRegistryError, TaskRegistryRepository, TaskRegistryResult, UpsertOutcome},
};
use async_trait::async_trait;
use dashmap::{DashMap, mapref::entry::Entry};
use std::sync::Arc;

/// Thread-safe in-memory registration store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRegistry {
    registrations: Arc<DashMap<RegistrationKey, TaskRegistration>>,
    run_info: Arc<DashMap<RegistrationId, Vec<TaskRunInfo>>>,
}

impl InMemoryTaskRegistry {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    /// Returns `true` when no registration is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}

#[async_trait]
impl TaskRegistryRepository for InMemoryTaskRegistry {
    async fn upsert(&self, candidate: TaskRegistration) -> TaskRegistryResult<UpsertOutcome> {
        let outcome = match self.registrations.entry(candidate.key().clone()) {
            Entry::Occupied(mut existing) => {
                existing.get_mut().reregister(&candidate);
                UpsertOutcome {
                    registration: existing.get().clone(),
                    created: false,
                }
            }
            Entry::Vacant(slot) => {
                self.run_info.insert(candidate.id(), Vec::new());
                slot.insert(candidate.clone());
                UpsertOutcome {
                    registration: candidate,
                    created: true,
                }
            }
        };
        Ok(outcome)
    }

    async fn find(&self, key: &RegistrationKey) -> TaskRegistryResult<Option<TaskRegistration>> {
        Ok(self
            .registrations
            .get(key)
            .map(|entry| entry.value().clone()))
    }

    async fn remove(&self, key: &RegistrationKey) -> TaskRegistryResult<bool> {
        let Some((_, removed)) = self.registrations.remove(key) else {
            return Ok(false);
        };
        self.run_info.remove(&removed.id());
        Ok(true)
    }

    async fn remove_for_node(&self, node: &str) -> TaskRegistryResult<usize> {
        let mut removed = Vec::new();
        self.registrations.retain(|key, registration| {
            if key.node == node {
                removed.push(registration.id());
                false
            } else {
                true
            }
        });
        for id in &removed {
            self.run_info.remove(id);
        }
        Ok(removed.len())
    }

    async fn list_for_node(&self, node: &str) -> TaskRegistryResult<Vec<TaskRegistration>> {
        let mut registrations: Vec<TaskRegistration> = self
            .registrations
            .iter()
            .filter(|entry| entry.key().node == node)
            .map(|entry| entry.value().clone())
            .collect();
        registrations.sort_by(|left, right| left.name().cmp(right.name()));
        Ok(registrations)
    }

    async fn update(&self, registration: &TaskRegistration) -> TaskRegistryResult<()> {
        let mut entry = self
            .registrations
            .get_mut(registration.key())
            .filter(|entry| entry.value().id() == registration.id())
            .ok_or(TaskRegistryError::NotFound(registration.id()))?;
        *entry.value_mut() = registration.clone();
        Ok(())
    }

    async fn append_run_info(&self, run_info: &TaskRunInfo) -> TaskRegistryResult<()> {
        let id = run_info.registration_id();
        let mut history = self
            .run_info
            .get_mut(&id)
            .ok_or(TaskRegistryError::NotFound(id))?;
        history.push(run_info.clone());
        Ok(())
    }

    async fn list_run_info(&self, id: RegistrationId) -> TaskRegistryResult<Vec<TaskRunInfo>> {
        Ok(self
            .run_info
            .get(&id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default())
    }
}
