//! Domain model of the task node.

mod error;
mod identity;
mod state;
mod task;

pub use error::TaskNodeError;
pub use identity::{DEFAULT_NODE_HOST, NodeIdentity};
pub use state::{ParseTaskNodeStateError, TaskNodeState};
pub use task::{RegistrationStatus, Task};
