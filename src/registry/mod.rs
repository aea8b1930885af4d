//! Coordinator-side task registry and dispatch.
//!
//! The coordinator keeps a durable record of every `(node, task)` pair a
//! node registered, a directory of known nodes, and an append-only run
//! history per registration. Execute requests are resolved against the
//! registry and forwarded to the owning node without waiting for the task
//! to run. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - The dispatcher service in [`services`]
//! - The coordinator HTTP API in [`http`]

pub mod adapters;
pub mod domain;
pub mod http;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
