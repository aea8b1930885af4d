//! Tests for the descriptor validation rules.

use crate::descriptor::domain::TaskConfigDocument;
use crate::descriptor::validation::{ConfigError, ConfigWarning, ValidationReport};
use rstest::rstest;

fn validate(yaml: &str) -> ValidationReport {
    TaskConfigDocument::from_yaml_str(yaml)
        .expect("yaml should parse")
        .validate()
}

#[rstest]
fn clean_configuration_has_no_diagnostics() {
    let report = validate(
        r"
name: n
tasks:
  t1:
    type: request
    commands: [echo hello]
",
    );

    assert!(report.is_valid());
    assert!(report.errors().is_empty());
    assert!(report.warnings().is_empty());
    assert_eq!(report.config().map(|config| config.name()), Some("n"));
}

#[rstest]
#[case("tasks: {}", "name")]
#[case("name: n", "tasks")]
#[case("name: n\ntasks: ~", "tasks")]
#[case("name: ~\ntasks: {}", "name")]
fn missing_top_level_key_is_reported(#[case] yaml: &str, #[case] key: &'static str) {
    let report = validate(yaml);

    assert!(!report.is_valid());
    assert!(report.errors().contains(&ConfigError::MissingKey { key }));
    assert!(report.config().is_none());
}

#[rstest]
fn empty_document_misses_both_keys() {
    let report = validate("");

    assert_eq!(
        report.errors(),
        [
            ConfigError::MissingKey { key: "name" },
            ConfigError::MissingKey { key: "tasks" },
        ]
    );
}

#[rstest]
fn scalar_root_is_rejected() {
    let report = validate("just text");

    assert_eq!(
        report.errors(),
        [ConfigError::RootNotMapping { found: "string" }]
    );
}

#[rstest]
#[case("[a, b]", "sequence")]
#[case("7", "number")]
#[case("tasks", "string")]
fn non_mapping_tasks_names_actual_type(#[case] tasks: &str, #[case] found: &'static str) {
    let report = validate(&format!("name: n\ntasks: {tasks}"));

    assert_eq!(report.errors(), [ConfigError::TasksNotMapping { found }]);
}

#[rstest]
#[case("bogus")]
#[case("REQUEST")]
fn unknown_type_yields_exactly_one_error_naming_task(#[case] value: &str) {
    let report = validate(&format!(
        "name: n\ntasks:\n  t1:\n    type: {value}\n    commands: [run]\n"
    ));

    assert_eq!(report.errors().len(), 1);
    let message = report.error_messages().join("\n");
    assert!(message.contains("t1"));
    assert!(message.contains(value));
}

#[rstest]
fn bogus_type_message_is_stable() {
    let report = validate("name: n\ntasks:\n  t1:\n    type: bogus\n    commands: [x]\n");

    assert_eq!(
        report.error_messages(),
        ["unknown task type for task t1: bogus"]
    );
}

#[rstest]
#[case("commands: [x]", ConfigError::MissingTaskType { task: "t1".to_owned() })]
#[case("type: 3\n    commands: [x]", ConfigError::TaskTypeNotString { task: "t1".to_owned(), found: "number" })]
#[case("type: request", ConfigError::MissingCommands { task: "t1".to_owned() })]
#[case("type: request\n    commands: run", ConfigError::CommandsNotSequence { task: "t1".to_owned(), found: "string" })]
#[case("type: request\n    commands: [run, {a: 1}]", ConfigError::CommandNotString { task: "t1".to_owned(), index: 1, found: "mapping" })]
#[case("type: request\n    commands: [x]\n    help: [a]", ConfigError::HelpNotString { task: "t1".to_owned(), found: "sequence" })]
#[case("type: request\n    commands: [x]\n    parameters: 5", ConfigError::ParametersNotSequence { task: "t1".to_owned(), found: "number" })]
#[case("type: request\n    commands: [x]\n    parameters: [[a], b]", ConfigError::ParameterNotSequence { task: "t1".to_owned(), index: 1, found: "string" })]
fn descriptor_rule_violations(#[case] body: &str, #[case] expected: ConfigError) {
    let report = validate(&format!("name: n\ntasks:\n  t1:\n    {body}\n"));

    assert_eq!(report.errors(), [expected]);
}

#[rstest]
fn errors_from_every_task_are_collected() {
    let report = validate(
        r"
name: n
tasks:
  t1:
    type: bogus
  t2: not-a-mapping
  t3:
    type: cron
    commands: [ok]
",
    );

    assert_eq!(
        report.errors(),
        [
            ConfigError::UnknownTaskType {
                task: "t1".to_owned(),
                value: "bogus".to_owned(),
            },
            ConfigError::MissingCommands {
                task: "t1".to_owned(),
            },
            ConfigError::DescriptorNotMapping {
                task: "t2".to_owned(),
                found: "string",
            },
        ]
    );
}

#[rstest]
fn unsafe_names_are_errors() {
    let report = validate("name: a/b\ntasks:\n  'x y':\n    type: request\n    commands: [x]\n");

    assert_eq!(
        report.errors(),
        [
            ConfigError::InvalidConfigName {
                name: "a/b".to_owned(),
            },
            ConfigError::InvalidTaskName {
                task: "x y".to_owned(),
            },
        ]
    );
}

#[rstest]
fn warnings_do_not_invalidate() {
    let report = validate(
        "name: n\ntasks:\n  t1:\n    type: request\n    commands: [x]\n    schedule: daily\n",
    );

    assert!(report.is_valid());
    assert_eq!(
        report.warnings(),
        [ConfigWarning::UnknownDescriptorKey {
            task: "t1".to_owned(),
            key: "schedule".to_owned(),
        }]
    );
}

#[rstest]
fn empty_task_mapping_warns() {
    let report = validate("name: n\ntasks: {}\n");

    assert!(report.is_valid());
    assert_eq!(report.warnings(), [ConfigWarning::NoTasks]);
}

#[rstest]
fn validation_is_repeatable() {
    let document = TaskConfigDocument::from_yaml_str("name: n\ntasks:\n  t1: {type: bogus}\n")
        .expect("yaml should parse");

    assert_eq!(document.validate(), document.validate());
}
