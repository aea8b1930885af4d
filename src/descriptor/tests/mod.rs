//! Unit tests for descriptor parsing and validation.

mod validation_tests;
