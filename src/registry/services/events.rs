//! Observable results of asynchronous dispatches.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Handle returned as soon as an execute request has been accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchTicket {
    /// Identifier shared by the event and run-info record of this dispatch.
    pub dispatch_id: Uuid,
}

/// How a forward to a node ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// The node accepted the request.
    Delivered {
        /// HTTP status returned by the node.
        status: u16,
    },
    /// The request never reached the node or the node refused it.
    DeliveryFailed {
        /// Failure description.
        reason: String,
    },
}

impl DispatchOutcome {
    /// Returns `true` for [`Self::Delivered`].
    #[must_use]
    pub const fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }
}

/// Broadcast once the delivery of a dispatch has finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchEvent {
    /// Dispatch identifier from the [`DispatchTicket`].
    pub dispatch_id: Uuid,
    /// Target node.
    pub node: String,
    /// Target task.
    pub task: String,
    /// Delivery result.
    pub outcome: DispatchOutcome,
}

/// Body stored in a registration's run history for every dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    /// Dispatch identifier.
    pub dispatch_id: Uuid,
    /// Parameters forwarded to the node.
    pub parameters: Value,
    /// Delivery result.
    #[serde(flatten)]
    pub outcome: DispatchOutcome,
}
