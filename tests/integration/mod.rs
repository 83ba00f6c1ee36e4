//! Integration Tests Module
//!
//! End-to-end tests against throwaway project trees. Each test builds its own
//! `.github/` layout in a temporary directory.

// Shared project builders
mod common;

// Documented validation and sync scenarios
mod scenarios_test;

// Idempotence, convergence and content preservation
mod sync_properties_test;

// Typed tool requests, registry and config
mod dispatch_test;
