//! Adapter implementations of the registry ports.

pub mod forwarder;
pub mod memory;
pub mod postgres;
