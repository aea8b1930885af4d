//! Unit tests for the coordinator registry.

mod memory_tests;
