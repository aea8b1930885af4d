//! HTTP surface of a task node.
//!
//! Every task is reachable at its endpoint path. A request body is handed to
//! the [`TaskRunner`](crate::node::ports::TaskRunner) on a spawned task and
//! acknowledged immediately.

mod endpoints;
mod handlers;

pub use endpoints::EndpointTable;
pub use handlers::{NodeHttpState, router};
