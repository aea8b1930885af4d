//! Port contracts of the coordinator registry.

mod directory;
mod forwarder;
mod registry;

pub use directory::{NodeDirectory, NodeDirectoryError, NodeDirectoryResult};
pub use forwarder::{ForwardReceipt, TaskForwardError, TaskForwarder};
pub use registry::{TaskRegistryError, TaskRegistryRepository, TaskRegistryResult, UpsertOutcome};
