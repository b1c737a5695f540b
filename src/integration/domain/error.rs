//! Error types for integration domain validation and parsing.

use crate::board::domain::TaskStatus;
use thiserror::Error;

/// Errors returned while constructing integration domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IntegrationDomainError {
    /// The remote system value is unsupported.
    #[error("unsupported remote system: {0}")]
    InvalidRemoteSystem(String),

    /// The remote project identifier is empty after trimming.
    #[error("remote project identifier must not be empty")]
    EmptyRemoteProjectId,

    /// The remote project name is empty after trimming.
    #[error("remote project name must not be empty")]
    EmptyRemoteProjectName,

    /// A field mapping has no remote field identifier.
    #[error("field mapping '{0}' has an empty remote field identifier")]
    EmptyRemoteFieldId(String),

    /// A reverse entry points at a remote value that maps to another status.
    #[error(
        "reverse mapping for '{status}' writes '{remote_value}', which does not map back to '{status}'"
    )]
    InconsistentReverseMapping {
        /// Local status with the inconsistent entry.
        status: TaskStatus,
        /// Remote value the reverse entry writes.
        remote_value: String,
    },

    /// The local field name is not a mappable task attribute.
    #[error("unknown local field: {0}")]
    InvalidLocalField(String),
}
