//! Hivetasks: declarative task nodes and a coordinator that dispatches to
//! them.
//!
//! A task node reads a YAML document describing named tasks, validates it,
//! exposes one HTTP endpoint per task, and registers those endpoints with
//! the coordinator. The coordinator keeps a registry of nodes and tasks and
//! forwards execute requests to the owning node.
//!
//! # Architecture
//!
//! Hivetasks follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, HTTP, shell)
//!
//! # Modules
//!
//! - [`descriptor`]: Task configuration documents and their validation
//! - [`node`]: The task node lifecycle, its endpoints, and task execution
//! - [`registry`]: Coordinator-side registration, run history, and dispatch
//! - [`protocol`]: Routes and JSON payloads shared by both sides
//! - [`settings`]: Process settings and feature flags

pub mod descriptor;
pub mod node;
pub mod protocol;
pub mod registry;
pub mod settings;
