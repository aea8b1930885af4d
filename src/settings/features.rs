//! Capability flags.

use std::collections::BTreeSet;

/// Feature flag that enables the task node.
pub const TASKS_FEATURE: &str = "tasks";

/// Set of enabled feature flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureSet {
    enabled: BTreeSet<String>,
}

impl FeatureSet {
    /// Creates a feature set from flag names.
    #[must_use]
    pub fn new<I, S>(flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            enabled: flags
                .into_iter()
                .map(|flag| flag.into().trim().to_owned())
                .filter(|flag| !flag.is_empty())
                .collect(),
        }
    }

    /// Creates a feature set with only the tasks feature enabled.
    #[must_use]
    pub fn with_tasks() -> Self {
        Self::new([TASKS_FEATURE])
    }

    /// Enables a flag.
    pub fn enable(&mut self, flag: impl Into<String>) {
        self.enabled.insert(flag.into());
    }

    /// Returns `true` when `flag` is enabled.
    #[must_use]
    pub fn is_enabled(&self, flag: &str) -> bool {
        self.enabled.contains(flag)
    }

    /// Returns `true` when the tasks feature is enabled.
    #[must_use]
    pub fn tasks_enabled(&self) -> bool {
        self.is_enabled(TASKS_FEATURE)
    }
}
