//! Application services of the coordinator.

mod dispatcher;
mod events;

pub use dispatcher::{
    DISPATCH_EVENT_CAPACITY, DispatchError, DispatchResult, NodeTasks, TaskDispatcher,
};
pub use events::{DispatchEvent, DispatchOutcome, DispatchTicket, RunRecord};
