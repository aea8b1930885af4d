//! Process configuration shared by the node and coordinator binaries.
//!
//! Settings come from an optional TOML file with defaults for every key.
//! The [`FeatureSet`] derived from them is handed to components that are
//! gated behind a capability, such as the task node.

mod features;
mod files;
mod hive;

pub use features::{FeatureSet, TASKS_FEATURE};
pub use files::read_text_file;
pub use hive::{HiveSettings, SettingsError};

#[cfg(test)]
mod tests;
