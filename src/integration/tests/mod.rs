//! Unit tests for the integration module.
//!
//! Tests are organised by component: connector errors, field mapping,
//! import-time suggestion, the integration aggregate, the registry service,
//! the status board, sync orchestration, and push-back.

mod support;
