//! Boardsync: external project synchronization for local kanban boards.
//!
//! This crate pulls work items from remote trackers (GitHub Projects and
//! Azure DevOps) into local board tasks, keeps them reconciled across
//! repeated runs, and writes local status changes back upstream.
//!
//! # Architecture
//!
//! Boardsync follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, APIs, etc.)
//!
//! # Modules
//!
//! - [`board`]: Local boards and tasks, the store sync writes into
//! - [`integration`]: Field mapping, connectors, sync, and push-back
//! - [`telemetry`]: Tracing subscriber setup

pub mod board;
pub mod integration;
pub mod telemetry;
