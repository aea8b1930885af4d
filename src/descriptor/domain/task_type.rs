//! Task type enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// How a task is meant to be triggered.
///
/// Both types are dispatched the same way; `cron` is carried through
/// registration so the coordinator can tell scheduled tasks apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    /// Triggered by an explicit execute request.
    Request,
    /// Intended to run on a schedule.
    Cron,
}

impl TaskType {
    /// Every accepted task type, in declaration order.
    pub const ALL: [Self; 2] = [Self::Request, Self::Cron];

    /// Returns the canonical configuration and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Request => "request",
            Self::Cron => "cron",
        }
    }
}

impl TryFrom<&str> for TaskType {
    type Error = ParseTaskTypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "request" => Ok(Self::Request),
            "cron" => Ok(Self::Cron),
            _ => Err(ParseTaskTypeError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned while parsing task types.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task type: {0}")]
pub struct ParseTaskTypeError(pub String);
