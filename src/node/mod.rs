//! Worker-side task node.
//!
//! A task node loads a task configuration, validates it, turns every
//! configured task into a [`domain::Task`] with its own HTTP endpoint,
//! registers the tasks with the coordinator and deregisters them again on
//! shutdown. The module follows the hexagonal layout used across the crate:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - The node lifecycle service in [`services`]
//! - The task endpoint router in [`http`]

pub mod adapters;
pub mod domain;
pub mod http;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
