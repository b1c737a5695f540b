//! Local boards and tasks for boardsync.
//!
//! This module is the local task store the synchronization engine reads
//! from and writes to. Tasks imported from an external project carry
//! [`domain::RemoteTaskMetadata`] linking them to the remote item they mirror.
//! The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]

pub mod adapters;
pub mod domain;
pub mod ports;

#[cfg(test)]
mod tests;
