//! Parsed, not yet validated, configuration documents.

use crate::descriptor::validation::{ValidationReport, validate_document};
use crate::settings::read_text_file;
use camino::{Utf8Path, Utf8PathBuf};
use serde_yaml::Value;
use thiserror::Error;

/// Errors raised while loading a configuration document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The document file could not be read.
    #[error("failed to read task configuration {path}: {source}")]
    Read {
        /// Path that was read.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The text is not well-formed YAML.
    #[error("failed to parse task configuration: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Raw YAML configuration of a task node.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskConfigDocument {
    root: Value,
}

impl TaskConfigDocument {
    /// Wraps an already parsed YAML value.
    #[must_use]
    pub const fn from_value(root: Value) -> Self {
        Self { root }
    }

    /// Parses YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Parse`] when the text is not valid YAML.
    pub fn from_yaml_str(text: &str) -> Result<Self, DocumentError> {
        Ok(Self::from_value(serde_yaml::from_str(text)?))
    }

    /// Reads and parses a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Read`] when the file cannot be read and
    /// [`DocumentError::Parse`] when it is not valid YAML.
    pub fn load(path: &Utf8Path) -> Result<Self, DocumentError> {
        let text = read_text_file(path).map_err(|source| DocumentError::Read {
            path: path.to_owned(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    /// Returns the document root.
    #[must_use]
    pub const fn root(&self) -> &Value {
        &self.root
    }

    /// Runs the validator over this document.
    #[must_use]
    pub fn validate(&self) -> ValidationReport {
        validate_document(self)
    }
}
