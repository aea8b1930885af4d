//! Task descriptors: the node-side configuration of invokable tasks.
//!
//! A node's configuration document is YAML with a top-level `name` and a
//! `tasks` mapping from task name to descriptor. The document is parsed
//! once, checked by [`validation::validate_document`], and only a clean
//! document is turned into the typed [`domain::TaskConfig`].
//!
//! - Domain types in [`domain`]
//! - Validation rules and diagnostics in [`validation`]

pub mod domain;
pub mod validation;

#[cfg(test)]
mod tests;
