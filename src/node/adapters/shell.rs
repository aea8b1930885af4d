//! Runs task commands through the system shell.

use crate::node::domain::Task;
use crate::node::ports::{CommandOutcome, TaskRunReport, TaskRunner, TaskRunnerError};
use async_trait::async_trait;
use camino::Utf8PathBuf;
use serde_json::Value;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::process::Stdio;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Environment variable carrying the full parameters object as JSON.
pub const PARAMETERS_ENV: &str = "HIVE_PARAMETERS";

/// Prefix of per-parameter environment variables.
pub const PARAMETER_ENV_PREFIX: &str = "HIVE_PARAM_";

/// Runs each command with `sh -c`, sequentially, stopping at the first
/// failure.
#[derive(Debug, Clone)]
pub struct ShellTaskRunner {
    shell: String,
    working_dir: Option<Utf8PathBuf>,
}

impl Default for ShellTaskRunner {
    fn default() -> Self {
        Self {
            shell: "sh".to_owned(),
            working_dir: None,
        }
    }
}

impl ShellTaskRunner {
    /// Creates a runner using `sh`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs commands from `dir` instead of the node's working directory.
    #[must_use]
    pub fn with_working_dir(mut self, dir: impl Into<Utf8PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }
}

/// Builds the environment exported to task commands.
///
/// Top-level keys of an object become `HIVE_PARAM_<KEY>` with the key
/// upper-cased and non-alphanumerics replaced by `_`. Strings are exported
/// verbatim, every other value as JSON.
///
/// Keys that normalise to the same variable (`a-b` and `a_b`) collide; the
/// lexicographically smallest key wins and the others are logged and
/// dropped. Every value stays available through `HIVE_PARAMETERS`.
#[must_use]
pub fn parameter_environment(parameters: &Value) -> Vec<(String, String)> {
    let mut environment = vec![(PARAMETERS_ENV.to_owned(), parameters.to_string())];
    let Value::Object(fields) = parameters else {
        return environment;
    };

    let mut exported: BTreeMap<String, (&str, String)> = BTreeMap::new();
    for (key, value) in fields {
        let text = match value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        let variable = format!("{PARAMETER_ENV_PREFIX}{}", env_key(key));
        match exported.entry(variable) {
            Entry::Vacant(slot) => {
                slot.insert((key.as_str(), text));
            }
            Entry::Occupied(mut taken) => {
                let kept = taken.get().0.min(key.as_str());
                let dropped = taken.get().0.max(key.as_str());
                warn!(
                    variable = %taken.key(),
                    kept,
                    dropped,
                    "parameter keys collide; dropping one from the environment"
                );
                if key.as_str() < taken.get().0 {
                    *taken.get_mut() = (key.as_str(), text);
                }
            }
        }
    }
    environment.extend(
        exported
            .into_iter()
            .map(|(variable, (_, text))| (variable, text)),
    );
    environment
}

fn env_key(key: &str) -> String {
    key.chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() {
                ch.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

#[async_trait]
impl TaskRunner for ShellTaskRunner {
    async fn run(&self, task: &Task, parameters: Value) -> Result<TaskRunReport, TaskRunnerError> {
        let environment = parameter_environment(&parameters);
        let mut outcomes = Vec::with_capacity(task.descriptor().commands().len());

        for command in task.descriptor().commands() {
            let mut process = tokio::process::Command::new(&self.shell);
            process
                .arg("-c")
                .arg(command)
                .envs(environment.iter().cloned())
                .env("HIVE_NODE", task.node().name())
                .env("HIVE_TASK", task.name())
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true);
            if let Some(dir) = &self.working_dir {
                process.current_dir(dir);
            }

            debug!(task = task.name(), %command, "running task command");
            let output = process
                .output()
                .await
                .map_err(|source| TaskRunnerError::Spawn {
                    command: command.clone(),
                    source: Arc::new(source),
                })?;

            let outcome = CommandOutcome {
                command: command.clone(),
                exit_code: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            };
            if !outcome.succeeded() {
                return Err(TaskRunnerError::CommandFailed {
                    command: outcome.command,
                    code: outcome.exit_code,
                    stderr: outcome.stderr,
                });
            }
            outcomes.push(outcome);
        }

        info!(
            task = task.name(),
            commands = outcomes.len(),
            "task run completed"
        );
        Ok(TaskRunReport {
            task: task.name().to_owned(),
            commands: outcomes,
        })
    }
}
