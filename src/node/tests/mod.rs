//! Unit tests for the task node.
