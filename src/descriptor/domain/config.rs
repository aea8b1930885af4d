//! Typed configuration built from a clean document.

use super::{TaskConfigDocument, TaskType};
use crate::descriptor::validation::ConfigError;
use serde::Serialize;
use thiserror::Error;

/// Execution recipe of one task.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskDescriptor {
    task_type: TaskType,
    commands: Vec<String>,
    help: Option<String>,
    parameters: Option<Vec<Vec<serde_yaml::Value>>>,
}

impl TaskDescriptor {
    /// Creates a descriptor with the given type and commands.
    #[must_use]
    pub const fn new(task_type: TaskType, commands: Vec<String>) -> Self {
        Self {
            task_type,
            commands,
            help: None,
            parameters: None,
        }
    }

    /// Sets the help text.
    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Sets the parameter lists.
    #[must_use]
    pub fn with_parameters(mut self, parameters: Vec<Vec<serde_yaml::Value>>) -> Self {
        self.parameters = Some(parameters);
        self
    }

    /// Returns the task type.
    #[must_use]
    pub const fn task_type(&self) -> TaskType {
        self.task_type
    }

    /// Returns the command strings, in execution order.
    #[must_use]
    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    /// Returns the help text, if any.
    #[must_use]
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Returns the parameter lists, if any.
    #[must_use]
    pub fn parameters(&self) -> Option<&[Vec<serde_yaml::Value>]> {
        self.parameters.as_deref()
    }
}

/// A named task entry of a configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskDefinition {
    name: String,
    descriptor: TaskDescriptor,
}

impl TaskDefinition {
    /// Creates a task entry.
    #[must_use]
    pub fn new(name: impl Into<String>, descriptor: TaskDescriptor) -> Self {
        Self {
            name: name.into(),
            descriptor,
        }
    }

    /// Returns the task name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the task descriptor.
    #[must_use]
    pub const fn descriptor(&self) -> &TaskDescriptor {
        &self.descriptor
    }
}

/// Validated configuration of a task node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskConfig {
    name: String,
    tasks: Vec<TaskDefinition>,
}

/// Error returned when a typed configuration is requested from a document
/// that failed validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("task configuration is invalid: {}", render_errors(.0))]
pub struct InvalidTaskConfig(pub Vec<ConfigError>);

fn render_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl TaskConfig {
    /// Creates a configuration from already checked parts.
    #[must_use]
    pub fn new(name: impl Into<String>, tasks: Vec<TaskDefinition>) -> Self {
        Self {
            name: name.into(),
            tasks,
        }
    }

    /// Validates a document and builds its typed configuration.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTaskConfig`] carrying every validation error when
    /// the document is not clean.
    pub fn from_document(document: &TaskConfigDocument) -> Result<Self, InvalidTaskConfig> {
        document.validate().into_config()
    }

    /// Returns the node name declared by the configuration.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the tasks in document order.
    #[must_use]
    pub fn tasks(&self) -> &[TaskDefinition] {
        &self.tasks
    }

    /// Finds a task by name.
    #[must_use]
    pub fn task(&self, name: &str) -> Option<&TaskDefinition> {
        self.tasks.iter().find(|task| task.name() == name)
    }
}
