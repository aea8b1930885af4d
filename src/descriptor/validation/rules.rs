//! Document walk applying the descriptor rules.

use super::{ConfigError, ConfigWarning, ValidationReport};
use crate::descriptor::domain::{
    TaskConfig, TaskConfigDocument, TaskDefinition, TaskDescriptor, TaskType, is_route_safe,
};
use serde_yaml::{Mapping, Value};

/// Descriptor keys the node interprets.
pub const KNOWN_DESCRIPTOR_KEYS: [&str; 4] = ["type", "commands", "help", "parameters"];

/// Returns a short name for the YAML type of `value`.
#[must_use]
pub const fn yaml_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

/// Validates a configuration document.
///
/// Every rule is applied and every finding is reported; the typed
/// configuration is attached to the report only when no error was found.
#[must_use]
pub fn validate_document(document: &TaskConfigDocument) -> ValidationReport {
    let mut diagnostics = Diagnostics::default();
    let empty = Mapping::new();
    let root = match document.root() {
        Value::Mapping(mapping) => mapping,
        Value::Null => &empty,
        other => {
            diagnostics.error(ConfigError::RootNotMapping {
                found: yaml_type_name(other),
            });
            return diagnostics.finish(None);
        }
    };

    let name = check_name(present(root.get("name")), &mut diagnostics);
    let tasks = check_tasks(present(root.get("tasks")), &mut diagnostics);
    let config = name
        .zip(tasks)
        .map(|(config_name, definitions)| TaskConfig::new(config_name, definitions));
    diagnostics.finish(config)
}

#[derive(Default)]
struct Diagnostics {
    errors: Vec<ConfigError>,
    warnings: Vec<ConfigWarning>,
}

impl Diagnostics {
    fn error(&mut self, error: ConfigError) {
        self.errors.push(error);
    }

    fn warn(&mut self, warning: ConfigWarning) {
        self.warnings.push(warning);
    }

    fn finish(self, config: Option<TaskConfig>) -> ValidationReport {
        ValidationReport::new(self.errors, self.warnings, config)
    }
}

/// Treats an explicit YAML null like an absent key.
fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|inner| !inner.is_null())
}

fn check_name(value: Option<&Value>, diagnostics: &mut Diagnostics) -> Option<String> {
    match value {
        None => {
            diagnostics.error(ConfigError::MissingKey { key: "name" });
            None
        }
        Some(Value::String(name)) if is_route_safe(name) => Some(name.clone()),
        Some(Value::String(name)) => {
            diagnostics.error(ConfigError::InvalidConfigName { name: name.clone() });
            None
        }
        Some(other) => {
            diagnostics.error(ConfigError::NameNotString {
                found: yaml_type_name(other),
            });
            None
        }
    }
}

fn check_tasks(value: Option<&Value>, diagnostics: &mut Diagnostics) -> Option<Vec<TaskDefinition>> {
    let tasks = match value {
        None => {
            diagnostics.error(ConfigError::MissingKey { key: "tasks" });
            return None;
        }
        Some(Value::Mapping(tasks)) => tasks,
        Some(other) => {
            diagnostics.error(ConfigError::TasksNotMapping {
                found: yaml_type_name(other),
            });
            return None;
        }
    };

    if tasks.is_empty() {
        diagnostics.warn(ConfigWarning::NoTasks);
    }

    let mut definitions = Vec::with_capacity(tasks.len());
    for (key, descriptor) in tasks {
        let Some(task) = key.as_str() else {
            diagnostics.error(ConfigError::InvalidTaskKey {
                found: yaml_type_name(key),
            });
            continue;
        };
        if !is_route_safe(task) {
            diagnostics.error(ConfigError::InvalidTaskName {
                task: task.to_owned(),
            });
        }
        if let Some(checked) = check_descriptor(task, descriptor, diagnostics) {
            definitions.push(TaskDefinition::new(task, checked));
        }
    }
    Some(definitions)
}

fn check_descriptor(
    task: &str,
    value: &Value,
    diagnostics: &mut Diagnostics,
) -> Option<TaskDescriptor> {
    let Value::Mapping(descriptor) = value else {
        diagnostics.error(ConfigError::DescriptorNotMapping {
            task: task.to_owned(),
            found: yaml_type_name(value),
        });
        return None;
    };

    let task_type = check_task_type(task, present(descriptor.get("type")), diagnostics);
    let commands = check_commands(task, present(descriptor.get("commands")), diagnostics);
    let help = check_help(task, present(descriptor.get("help")), diagnostics);
    let parameters = check_parameters(task, present(descriptor.get("parameters")), diagnostics);
    warn_unknown_keys(task, descriptor, diagnostics);

    let (task_type, commands, help, parameters) = (task_type?, commands?, help?, parameters?);
    let mut checked = TaskDescriptor::new(task_type, commands);
    if let Some(text) = help {
        checked = checked.with_help(text);
    }
    if let Some(lists) = parameters {
        checked = checked.with_parameters(lists);
    }
    Some(checked)
}

fn check_task_type(
    task: &str,
    value: Option<&Value>,
    diagnostics: &mut Diagnostics,
) -> Option<TaskType> {
    let error = match value {
        None => ConfigError::MissingTaskType {
            task: task.to_owned(),
        },
        Some(Value::String(raw)) => match TaskType::try_from(raw.as_str()) {
            Ok(task_type) => return Some(task_type),
            Err(_) => ConfigError::UnknownTaskType {
                task: task.to_owned(),
                value: raw.clone(),
            },
        },
        Some(other) => ConfigError::TaskTypeNotString {
            task: task.to_owned(),
            found: yaml_type_name(other),
        },
    };
    diagnostics.error(error);
    None
}

fn check_commands(
    task: &str,
    value: Option<&Value>,
    diagnostics: &mut Diagnostics,
) -> Option<Vec<String>> {
    let entries = match value {
        None => {
            diagnostics.error(ConfigError::MissingCommands {
                task: task.to_owned(),
            });
            return None;
        }
        Some(Value::Sequence(entries)) => entries,
        Some(other) => {
            diagnostics.error(ConfigError::CommandsNotSequence {
                task: task.to_owned(),
                found: yaml_type_name(other),
            });
            return None;
        }
    };

    let mut commands = Vec::with_capacity(entries.len());
    let mut clean = true;
    for (index, entry) in entries.iter().enumerate() {
        match entry.as_str() {
            Some(command) => commands.push(command.to_owned()),
            None => {
                clean = false;
                diagnostics.error(ConfigError::CommandNotString {
                    task: task.to_owned(),
                    index,
                    found: yaml_type_name(entry),
                });
            }
        }
    }
    clean.then_some(commands)
}

/// Returns `Some(None)` for an absent help text and `None` on error.
fn check_help(
    task: &str,
    value: Option<&Value>,
    diagnostics: &mut Diagnostics,
) -> Option<Option<String>> {
    match value {
        None => Some(None),
        Some(Value::String(help)) => Some(Some(help.clone())),
        Some(other) => {
            diagnostics.error(ConfigError::HelpNotString {
                task: task.to_owned(),
                found: yaml_type_name(other),
            });
            None
        }
    }
}

/// Returns `Some(None)` for absent parameters and `None` on error.
fn check_parameters(
    task: &str,
    value: Option<&Value>,
    diagnostics: &mut Diagnostics,
) -> Option<Option<Vec<Vec<Value>>>> {
    let entries = match value {
        None => return Some(None),
        Some(Value::Sequence(entries)) => entries,
        Some(other) => {
            diagnostics.error(ConfigError::ParametersNotSequence {
                task: task.to_owned(),
                found: yaml_type_name(other),
            });
            return None;
        }
    };

    let mut lists = Vec::with_capacity(entries.len());
    let mut clean = true;
    for (index, entry) in entries.iter().enumerate() {
        if let Value::Sequence(list) = entry {
            lists.push(list.clone());
        } else {
            clean = false;
            diagnostics.error(ConfigError::ParameterNotSequence {
                task: task.to_owned(),
                index,
                found: yaml_type_name(entry),
            });
        }
    }
    clean.then_some(Some(lists))
}

fn warn_unknown_keys(task: &str, descriptor: &Mapping, diagnostics: &mut Diagnostics) {
    for key in descriptor.keys() {
        let known = key
            .as_str()
            .is_some_and(|name| KNOWN_DESCRIPTOR_KEYS.contains(&name));
        if known {
            continue;
        }
        let key_name = key
            .as_str()
            .map_or_else(|| yaml_type_name(key).to_owned(), ToOwned::to_owned);
        diagnostics.warn(ConfigWarning::UnknownDescriptorKey {
            task: task.to_owned(),
            key: key_name,
        });
    }
}
