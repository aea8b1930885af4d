//! Task node errors.

use super::TaskNodeState;
use crate::descriptor::domain::InvalidTaskConfig;
use thiserror::Error;

/// Errors raised by the task node lifecycle.
#[derive(Debug, Error)]
pub enum TaskNodeError {
    /// The capability the node depends on is not enabled.
    #[error("feature {feature:?} is not enabled")]
    FeatureDisabled {
        /// Name of the missing feature flag.
        feature: &'static str,
    },

    /// The node name cannot be used in endpoint paths.
    #[error("invalid node name {0:?}")]
    InvalidNodeName(String),

    /// A typed configuration was requested from an invalid document.
    #[error(transparent)]
    InvalidConfiguration(#[from] InvalidTaskConfig),

    /// The lifecycle state machine does not permit the transition.
    #[error("cannot transition task node from {from} to {to}")]
    InvalidTransition {
        /// Current state.
        from: TaskNodeState,
        /// Requested state.
        to: TaskNodeState,
    },

    /// Tasks were already announced to the coordinator, so the task set
    /// can no longer be rebuilt.
    #[error("{registered} task(s) already announced to the coordinator; shut down before revalidating")]
    AlreadyRegistered {
        /// Number of tasks with a registration attempt on record.
        registered: usize,
    },

    /// The operation requires a validated configuration.
    #[error("task node configuration is not valid (state: {state})")]
    NotValid {
        /// State the node was in.
        state: TaskNodeState,
    },

    /// The task endpoint server failed.
    #[error("task endpoint server failed: {0}")]
    Serve(#[source] std::io::Error),
}
