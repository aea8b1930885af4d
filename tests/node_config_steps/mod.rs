//! Step definitions for task node configuration scenarios.

mod given;
mod then;
mod when;
pub mod world;
