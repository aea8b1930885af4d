//! Typed task configuration values.

mod config;
mod document;
mod names;
mod task_type;

pub use config::{InvalidTaskConfig, TaskConfig, TaskDefinition, TaskDescriptor};
pub use document::{DocumentError, TaskConfigDocument};
pub use names::is_route_safe;
pub use task_type::{ParseTaskTypeError, TaskType};
