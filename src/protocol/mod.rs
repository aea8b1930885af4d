//! Wire contract shared by task nodes and the coordinator.
//!
//! Nodes and the coordinator only talk over HTTP with JSON bodies. This
//! module owns the route constants, the payload shapes, and the
//! required-field checks both sides apply before touching any state.

mod endpoints;
mod error;
mod payloads;

pub use endpoints::{
    EXECUTE_TASK_PATH, LIST_TASKS_JSON_PATH, LIST_TASKS_PATH, NodeStatus, ParseNodeStatusError,
    REGISTER_NODE_PATH, REGISTER_TASK_PATH, TASK_NODE_METADATA_KEY, TASK_NODE_METADATA_VALUE,
    TASK_ROUTE, TASK_ROUTE_PREFIX, task_endpoint,
};
pub use error::PayloadError;
pub use payloads::{
    Ack, DeregisterNodePayload, DeregisterTaskPayload, ErrorBody, ExecuteAck, ExecuteTaskRequest,
    RegisterNodePayload, RegisterTaskPayload, RegistrationAck, parse_payload,
    termination_requested,
};

#[cfg(test)]
mod tests;
