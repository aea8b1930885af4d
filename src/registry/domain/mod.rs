//! Domain model of the coordinator registry.

mod error;
mod ids;
mod known_node;
mod registration;
mod run_info;

pub use error::ParseRegistrationStateError;
pub use ids::{RegistrationId, RunInfoId};
pub use known_node::{KnownNode, PersistedKnownNodeData};
pub use registration::{
    PersistedTaskRegistrationData, RegistrationKey, RegistrationState, TaskRegistration,
};
pub use run_info::TaskRunInfo;
