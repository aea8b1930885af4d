//! Tests for TOML settings and feature flags.

use crate::settings::{FeatureSet, HiveSettings, SettingsError, TASKS_FEATURE};
use camino::Utf8PathBuf;
use rstest::rstest;
use std::io::Write;

#[rstest]
fn empty_document_yields_defaults() {
    let settings = HiveSettings::from_toml_str("").expect("empty settings should parse");

    assert_eq!(settings, HiveSettings::default());
    assert!(!settings.feature_set().tasks_enabled());
}

#[rstest]
fn explicit_values_override_defaults() {
    let text = r#"
features = ["tasks", "  "]
coordinator_url = "http://coordinator:9000"
default_port = 9100
request_timeout_secs = 3
"#;

    let settings = HiveSettings::from_toml_str(text).expect("settings should parse");

    assert_eq!(settings.coordinator_url, "http://coordinator:9000");
    assert_eq!(settings.default_port, 9100);
    assert_eq!(settings.request_timeout().as_secs(), 3);
    assert_eq!(settings.feature_set(), FeatureSet::with_tasks());
}

#[rstest]
fn unknown_keys_are_rejected() {
    let result = HiveSettings::from_toml_str("colour = \"blue\"");

    assert!(matches!(result, Err(SettingsError::Parse(_))));
}

#[rstest]
fn settings_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file should be created");
    writeln!(file, "features = [\"tasks\"]").expect("settings should be written");
    let path = Utf8PathBuf::from_path_buf(file.path().to_path_buf())
        .expect("temp path should be UTF-8");

    let settings = HiveSettings::load(&path).expect("settings should load");

    assert!(settings.feature_set().is_enabled(TASKS_FEATURE));
}

#[rstest]
fn missing_file_reports_path() {
    let path = Utf8PathBuf::from("/nonexistent/hive/settings.toml");

    let err = HiveSettings::load(&path).expect_err("load should fail");

    assert!(matches!(err, SettingsError::Read { .. }));
    assert!(err.to_string().contains("/nonexistent/hive/settings.toml"));
}

#[rstest]
fn feature_set_can_be_extended() {
    let mut features = FeatureSet::default();
    assert!(!features.tasks_enabled());

    features.enable(TASKS_FEATURE);

    assert!(features.tasks_enabled());
}
