//! Payload validation errors.

use thiserror::Error;

/// Errors raised while checking an inbound JSON payload.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PayloadError {
    /// The body is not a JSON object.
    #[error("{context} payload must be a JSON object")]
    NotAnObject {
        /// Operation the payload was sent to.
        context: &'static str,
    },

    /// One or more required fields are absent or null.
    #[error("missing required field(s) for {context}: {}", .fields.join(", "))]
    MissingRequiredField {
        /// Operation the payload was sent to.
        context: &'static str,
        /// Names of the missing fields, in declaration order.
        fields: Vec<String>,
    },

    /// A field is present but has the wrong shape.
    #[error("invalid {context} payload: {reason}")]
    InvalidField {
        /// Operation the payload was sent to.
        context: &'static str,
        /// Deserializer message describing the problem.
        reason: String,
    },
}

impl PayloadError {
    /// Returns the missing field names for [`Self::MissingRequiredField`].
    #[must_use]
    pub fn missing_fields(&self) -> &[String] {
        match self {
            Self::MissingRequiredField { fields, .. } => fields,
            Self::NotAnObject { .. } | Self::InvalidField { .. } => &[],
        }
    }
}
