//! Task forwarder adapters.

mod http;
mod recording;

pub use http::HttpTaskForwarder;
pub use recording::{ForwardCall, RecordingTaskForwarder};
