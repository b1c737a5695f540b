//! Bidirectional translation between remote field values and local task
//! attributes.

use super::IntegrationDomainError;
use crate::board::domain::TaskStatus;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Local task attribute a remote field is mapped onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocalField {
    /// The task status column.
    Status,
}

impl LocalField {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Status => "status",
        }
    }
}

impl TryFrom<&str> for LocalField {
    type Error = IntegrationDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "status" => Ok(Self::Status),
            _ => Err(IntegrationDomainError::InvalidLocalField(value.to_owned())),
        }
    }
}

impl fmt::Display for LocalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Translation table between one remote field and one local attribute.
///
/// Neither direction needs to be total. Remote values without an entry fall
/// back to a default status; statuses without a reverse entry cannot be
/// written back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    remote_field_id: String,
    remote_field_name: String,
    local_field: LocalField,
    value_map: BTreeMap<String, TaskStatus>,
    reverse_map: BTreeMap<TaskStatus, String>,
}

impl FieldMapping {
    /// Creates an empty mapping for a remote field.
    #[must_use]
    pub fn new(
        remote_field_id: impl Into<String>,
        remote_field_name: impl Into<String>,
        local_field: LocalField,
    ) -> Self {
        Self {
            remote_field_id: remote_field_id.into().trim().to_owned(),
            remote_field_name: remote_field_name.into().trim().to_owned(),
            local_field,
            value_map: BTreeMap::new(),
            reverse_map: BTreeMap::new(),
        }
    }

    /// Adds a remote-to-local entry.
    #[must_use]
    pub fn with_value(mut self, remote_value: impl Into<String>, status: TaskStatus) -> Self {
        self.value_map
            .insert(remote_value.into().trim().to_owned(), status);
        self
    }

    /// Adds a local-to-remote entry.
    #[must_use]
    pub fn with_reverse(mut self, status: TaskStatus, remote_value: impl Into<String>) -> Self {
        self.reverse_map
            .insert(status, remote_value.into().trim().to_owned());
        self
    }

    /// Adds an entry in both directions.
    #[must_use]
    pub fn with_pair(self, remote_value: impl Into<String>, status: TaskStatus) -> Self {
        let value = remote_value.into();
        self.with_value(value.clone(), status)
            .with_reverse(status, value)
    }

    /// Checks that every reverse entry maps back to its own status.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationDomainError::EmptyRemoteFieldId`] when the field
    /// has no identifier, or
    /// [`IntegrationDomainError::InconsistentReverseMapping`] for the first
    /// reverse entry that does not round-trip.
    pub fn validate(&self) -> Result<(), IntegrationDomainError> {
        if self.remote_field_id.is_empty() {
            return Err(IntegrationDomainError::EmptyRemoteFieldId(
                self.remote_field_name.clone(),
            ));
        }
        for (status, remote_value) in &self.reverse_map {
            if self.value_map.get(remote_value) != Some(status) {
                return Err(IntegrationDomainError::InconsistentReverseMapping {
                    status: *status,
                    remote_value: remote_value.clone(),
                });
            }
        }
        Ok(())
    }

    /// Returns the remote field identifier.
    #[must_use]
    pub fn remote_field_id(&self) -> &str {
        &self.remote_field_id
    }

    /// Returns the remote field display name.
    #[must_use]
    pub fn remote_field_name(&self) -> &str {
        &self.remote_field_name
    }

    /// Returns the mapped local attribute.
    #[must_use]
    pub const fn local_field(&self) -> LocalField {
        self.local_field
    }

    /// Returns the remote-to-local table.
    #[must_use]
    pub const fn value_map(&self) -> &BTreeMap<String, TaskStatus> {
        &self.value_map
    }

    /// Returns the local-to-remote table.
    #[must_use]
    pub const fn reverse_map(&self) -> &BTreeMap<TaskStatus, String> {
        &self.reverse_map
    }

    /// Translates a remote value, falling back to `default` when unmapped.
    #[must_use]
    pub fn to_local_status(&self, remote_value: &str, default: TaskStatus) -> TaskStatus {
        self.value_map
            .get(remote_value.trim())
            .copied()
            .unwrap_or(default)
    }

    /// Translates a local status into the remote value to write.
    ///
    /// Returns `None` when the status has no reverse entry.
    #[must_use]
    pub fn to_remote_value(&self, status: TaskStatus) -> Option<&str> {
        self.reverse_map.get(&status).map(String::as_str)
    }
}

/// Resolves the local status for a remote value.
///
/// Never fails: a missing mapping, a missing value, or an unmapped value all
/// yield `default`.
#[must_use]
pub fn resolve_local_status(
    mapping: Option<&FieldMapping>,
    remote_value: Option<&str>,
    default: TaskStatus,
) -> TaskStatus {
    match (mapping, remote_value) {
        (Some(field_mapping), Some(value)) => field_mapping.to_local_status(value, default),
        _ => default,
    }
}
