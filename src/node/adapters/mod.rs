//! Adapter implementations of the task node ports.

pub mod http;
pub mod memory;
pub mod shell;
