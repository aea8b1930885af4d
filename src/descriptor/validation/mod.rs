//! Validation of task configuration documents.
//!
//! Validation is pure: it never fails as a whole, it collects every error
//! and warning it finds in document order. A typed
//! [`TaskConfig`](crate::descriptor::domain::TaskConfig) is only built when
//! no error was found.

mod diagnostics;
mod rules;

pub use diagnostics::{ConfigError, ConfigWarning, ValidationReport};
pub use rules::{KNOWN_DESCRIPTOR_KEYS, validate_document, yaml_type_name};
