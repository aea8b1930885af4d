//! TOML-backed process settings.

use super::{FeatureSet, read_text_file};
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors raised while loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file could not be read.
    #[error("failed to read settings file {path}: {source}")]
    Read {
        /// Path that was read.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid TOML for [`HiveSettings`].
    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Settings shared by `hive-node` and `hive-coordinator`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HiveSettings {
    /// Enabled feature flags.
    pub features: Vec<String>,
    /// Base URL nodes use to reach the coordinator.
    pub coordinator_url: String,
    /// Address servers bind to.
    pub bind_host: String,
    /// Port a node serves task endpoints on when none is given.
    pub default_port: u16,
    /// Port the coordinator listens on.
    pub coordinator_port: u16,
    /// Timeout applied to outbound HTTP requests, in seconds.
    pub request_timeout_secs: u64,
    /// `PostgreSQL` URL for the coordinator registry; in-memory when unset.
    pub database_url: Option<String>,
}

impl Default for HiveSettings {
    fn default() -> Self {
        Self {
            features: Vec::new(),
            coordinator_url: "http://127.0.0.1:8000".to_owned(),
            bind_host: "127.0.0.1".to_owned(),
            default_port: 8085,
            coordinator_port: 8000,
            request_timeout_secs: 10,
            database_url: None,
        }
    }
}

impl HiveSettings {
    /// Parses settings from TOML text; missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Parse`] for malformed TOML or unknown keys.
    pub fn from_toml_str(text: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(text)?)
    }

    /// Loads settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Read`] when the file cannot be read and
    /// [`SettingsError::Parse`] when it is not valid settings TOML.
    pub fn load(path: &Utf8Path) -> Result<Self, SettingsError> {
        let text = read_text_file(path).map_err(|source| SettingsError::Read {
            path: path.to_owned(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Returns the enabled feature flags.
    #[must_use]
    pub fn feature_set(&self) -> FeatureSet {
        FeatureSet::new(self.features.iter().map(String::as_str))
    }

    /// Returns the outbound request timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
