//! External project synchronization for boardsync.
//!
//! An integration links one local board to one remote project (a GitHub
//! Project or an Azure DevOps project). This module pulls remote items into
//! local tasks, keeps them reconciled across repeated runs, and writes local
//! status changes back upstream. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
