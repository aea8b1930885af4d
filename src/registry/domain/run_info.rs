//! Append-only run history.

use super::{RegistrationId, RunInfoId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry of a registration's run history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRunInfo {
    id: RunInfoId,
    registration_id: RegistrationId,
    info: Option<Value>,
    recorded_at: DateTime<Utc>,
}

impl TaskRunInfo {
    /// Creates a run-info record stamped with the current time.
    #[must_use]
    pub fn new(registration_id: RegistrationId, info: Option<Value>, clock: &impl Clock) -> Self {
        Self {
            id: RunInfoId::new(),
            registration_id,
            info,
            recorded_at: clock.utc(),
        }
    }

    /// Reconstructs a record from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        id: RunInfoId,
        registration_id: RegistrationId,
        info: Option<Value>,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            registration_id,
            info,
            recorded_at,
        }
    }

    /// Returns the identifier.
    #[must_use]
    pub const fn id(&self) -> RunInfoId {
        self.id
    }

    /// Returns the registration the record belongs to.
    #[must_use]
    pub const fn registration_id(&self) -> RegistrationId {
        self.registration_id
    }

    /// Returns the opaque payload.
    #[must_use]
    pub const fn info(&self) -> Option<&Value> {
        self.info.as_ref()
    }

    /// Returns when the record was written.
    #[must_use]
    pub const fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}
