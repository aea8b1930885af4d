//! Validation diagnostics.

use crate::descriptor::domain::{InvalidTaskConfig, TaskConfig};
use thiserror::Error;

/// A problem that prevents the configuration from being used.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The document root is neither a mapping nor empty.
    #[error("task configuration must be a mapping, found {found}")]
    RootNotMapping {
        /// YAML type of the root.
        found: &'static str,
    },

    /// A required top-level key is absent or null.
    #[error("missing required key: {key}")]
    MissingKey {
        /// The missing key.
        key: &'static str,
    },

    /// The node name is not a string.
    #[error("name must be a string, found {found}")]
    NameNotString {
        /// YAML type of the value.
        found: &'static str,
    },

    /// The node name cannot be used in an endpoint path.
    #[error("name {name:?} may only contain letters, digits, '_', '-' and '.'")]
    InvalidConfigName {
        /// Offending name.
        name: String,
    },

    /// `tasks` is present but not a mapping.
    #[error("tasks must be a mapping, found {found}")]
    TasksNotMapping {
        /// YAML type of the value.
        found: &'static str,
    },

    /// A task key is not a string.
    #[error("task names must be strings, found {found}")]
    InvalidTaskKey {
        /// YAML type of the key.
        found: &'static str,
    },

    /// A task name cannot be used in an endpoint path.
    #[error("task name {task:?} may only contain letters, digits, '_', '-' and '.'")]
    InvalidTaskName {
        /// Offending task name.
        task: String,
    },

    /// A task descriptor is not a mapping.
    #[error("descriptor for task {task} must be a mapping, found {found}")]
    DescriptorNotMapping {
        /// Task name.
        task: String,
        /// YAML type of the descriptor.
        found: &'static str,
    },

    /// A task has no `type`.
    #[error("missing task type for task {task}")]
    MissingTaskType {
        /// Task name.
        task: String,
    },

    /// A task `type` is not a string.
    #[error("task type for task {task} must be a string, found {found}")]
    TaskTypeNotString {
        /// Task name.
        task: String,
        /// YAML type of the value.
        found: &'static str,
    },

    /// A task `type` is a string outside the accepted set.
    #[error("unknown task type for task {task}: {value}")]
    UnknownTaskType {
        /// Task name.
        task: String,
        /// Offending value.
        value: String,
    },

    /// A task has no `commands`.
    #[error("missing commands for task {task}")]
    MissingCommands {
        /// Task name.
        task: String,
    },

    /// `commands` is not a sequence.
    #[error("commands for task {task} must be a sequence, found {found}")]
    CommandsNotSequence {
        /// Task name.
        task: String,
        /// YAML type of the value.
        found: &'static str,
    },

    /// A command entry is not a string.
    #[error("command {index} of task {task} must be a string, found {found}")]
    CommandNotString {
        /// Task name.
        task: String,
        /// Zero-based position in `commands`.
        index: usize,
        /// YAML type of the entry.
        found: &'static str,
    },

    /// `help` is present but not a string.
    #[error("help for task {task} must be a string, found {found}")]
    HelpNotString {
        /// Task name.
        task: String,
        /// YAML type of the value.
        found: &'static str,
    },

    /// `parameters` is present but not a sequence.
    #[error("parameters for task {task} must be a sequence, found {found}")]
    ParametersNotSequence {
        /// Task name.
        task: String,
        /// YAML type of the value.
        found: &'static str,
    },

    /// A `parameters` entry is not itself a sequence.
    #[error("parameter list {index} of task {task} must be a sequence, found {found}")]
    ParameterNotSequence {
        /// Task name.
        task: String,
        /// Zero-based position in `parameters`.
        index: usize,
        /// YAML type of the entry.
        found: &'static str,
    },
}

/// A problem that does not prevent the configuration from being used.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigWarning {
    /// The `tasks` mapping is empty.
    #[error("configuration declares no tasks")]
    NoTasks,

    /// A descriptor carries a key the node does not interpret.
    #[error("unknown key {key:?} in descriptor for task {task}")]
    UnknownDescriptorKey {
        /// Task name.
        task: String,
        /// Unrecognised key.
        key: String,
    },
}

/// Ordered diagnostics of one validation run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    errors: Vec<ConfigError>,
    warnings: Vec<ConfigWarning>,
    config: Option<TaskConfig>,
}

impl ValidationReport {
    /// Creates a report; `config` is discarded when `errors` is non-empty.
    #[must_use]
    pub fn new(
        errors: Vec<ConfigError>,
        warnings: Vec<ConfigWarning>,
        config: Option<TaskConfig>,
    ) -> Self {
        let config = if errors.is_empty() { config } else { None };
        Self {
            errors,
            warnings,
            config,
        }
    }

    /// Returns `true` when no error was found.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the errors in discovery order.
    #[must_use]
    pub fn errors(&self) -> &[ConfigError] {
        &self.errors
    }

    /// Returns the warnings in discovery order.
    #[must_use]
    pub fn warnings(&self) -> &[ConfigWarning] {
        &self.warnings
    }

    /// Returns the error messages in discovery order.
    #[must_use]
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// Returns the warning messages in discovery order.
    #[must_use]
    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings.iter().map(ToString::to_string).collect()
    }

    /// Returns the typed configuration of a clean document.
    #[must_use]
    pub const fn config(&self) -> Option<&TaskConfig> {
        self.config.as_ref()
    }

    /// Consumes the report, yielding the typed configuration.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTaskConfig`] with every error when the document was
    /// not clean.
    pub fn into_config(self) -> Result<TaskConfig, InvalidTaskConfig> {
        match self.config {
            Some(config) if self.errors.is_empty() => Ok(config),
            _ => Err(InvalidTaskConfig(self.errors)),
        }
    }
}
