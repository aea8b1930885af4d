//! Unit tests for settings loading.

mod settings_tests;
