//! Task node lifecycle states.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Lifecycle state of a task node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskNodeState {
    /// Constructed; the configuration has not been checked.
    Uninitialized,
    /// The configuration is being checked.
    Validating,
    /// The configuration is clean; tasks may be created.
    Valid,
    /// The configuration has errors; start-up is refused.
    Invalid,
    /// Task endpoints are being served.
    Running,
    /// Tasks have been deregistered.
    Shutdown,
}

impl TaskNodeState {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Validating => "validating",
            Self::Valid => "valid",
            Self::Invalid => "invalid",
            Self::Running => "running",
            Self::Shutdown => "shutdown",
        }
    }

    /// Returns `true` when the state machine permits moving to `target`.
    ///
    /// Validation can be re-run from any settled pre-start state. Once the
    /// node runs, the only way forward is shutdown.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (
                Self::Uninitialized | Self::Valid | Self::Invalid,
                Self::Validating
            ) | (Self::Validating, Self::Valid | Self::Invalid)
                | (Self::Valid, Self::Running | Self::Shutdown)
                | (Self::Running, Self::Shutdown)
        )
    }

    /// Returns `true` for states after which the node never validates again.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Running | Self::Shutdown)
    }
}

impl TryFrom<&str> for TaskNodeState {
    type Error = ParseTaskNodeStateError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "uninitialized" => Ok(Self::Uninitialized),
            "validating" => Ok(Self::Validating),
            "valid" => Ok(Self::Valid),
            "invalid" => Ok(Self::Invalid),
            "running" => Ok(Self::Running),
            "shutdown" => Ok(Self::Shutdown),
            _ => Err(ParseTaskNodeStateError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskNodeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned while parsing task node states.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task node state: {0}")]
pub struct ParseTaskNodeStateError(pub String);
