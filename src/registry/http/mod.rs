//! HTTP API of the coordinator.
//!
//! Nodes announce themselves and their tasks here, clients submit execute
//! requests, and operators browse the registry through `GET /tasks`.

mod error;
mod handlers;
mod view;

pub use error::ApiError;
pub use handlers::router;
pub use view::render_task_listing;
