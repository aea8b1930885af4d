//! Parse errors for persisted registry values.

use thiserror::Error;

/// Error returned while parsing registration states from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown registration state: {0}")]
pub struct ParseRegistrationStateError(pub String);
