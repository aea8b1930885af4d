//! In-memory adapters recording node activity for tests and demos.

mod coordinator;
mod runner;

pub use coordinator::{CoordinatorCall, RecordingCoordinatorClient};
pub use runner::{RecordedRun, RecordingTaskRunner};
