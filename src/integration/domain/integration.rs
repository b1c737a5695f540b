//! Integration aggregate: a configured link between a board and a remote
//! project.

use super::{FieldMapping, IntegrationDomainError, IntegrationId, LocalField, RemoteSystem};
use crate::board::domain::BoardId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Parameter object for creating an integration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIntegration {
    /// Remote tracker.
    pub remote_system: RemoteSystem,
    /// Remote project identifier (GitHub project node id, Azure project name).
    pub remote_project_id: String,
    /// Remote project display name.
    pub remote_project_name: String,
    /// Board the integration populates.
    pub local_board_id: BoardId,
    /// Field mappings confirmed at import.
    pub field_mappings: Vec<FieldMapping>,
    /// Remote item types to import; empty imports every type.
    pub type_filter: Vec<String>,
    /// Remote field written on push-back.
    pub status_field_id: Option<String>,
}

/// Integration aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Integration {
    id: IntegrationId,
    remote_system: RemoteSystem,
    remote_project_id: String,
    remote_project_name: String,
    local_board_id: BoardId,
    field_mappings: Vec<FieldMapping>,
    type_filter: Vec<String>,
    status_field_id: Option<String>,
    last_sync_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted integration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedIntegrationData {
    /// Persisted identifier.
    pub id: IntegrationId,
    /// Persisted remote tracker.
    pub remote_system: RemoteSystem,
    /// Persisted remote project identifier.
    pub remote_project_id: String,
    /// Persisted remote project name.
    pub remote_project_name: String,
    /// Persisted board link.
    pub local_board_id: BoardId,
    /// Persisted field mappings.
    pub field_mappings: Vec<FieldMapping>,
    /// Persisted type filter.
    pub type_filter: Vec<String>,
    /// Persisted status field identifier.
    pub status_field_id: Option<String>,
    /// Persisted last successful sync.
    pub last_sync_at: Option<DateTime<Utc>>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Integration {
    /// Creates a validated integration.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationDomainError`] when the project identifier or name
    /// is blank or any field mapping fails validation.
    pub fn new(params: NewIntegration, clock: &impl Clock) -> Result<Self, IntegrationDomainError> {
        let NewIntegration {
            remote_system,
            remote_project_id,
            remote_project_name,
            local_board_id,
            field_mappings,
            type_filter,
            status_field_id,
        } = params;

        let project_id = remote_project_id.trim();
        if project_id.is_empty() {
            return Err(IntegrationDomainError::EmptyRemoteProjectId);
        }
        let project_name = remote_project_name.trim();
        if project_name.is_empty() {
            return Err(IntegrationDomainError::EmptyRemoteProjectName);
        }
        for mapping in &field_mappings {
            mapping.validate()?;
        }

        let timestamp = clock.utc();
        Ok(Self {
            id: IntegrationId::new(),
            remote_system,
            remote_project_id: project_id.to_owned(),
            remote_project_name: project_name.to_owned(),
            local_board_id,
            field_mappings,
            type_filter: type_filter
                .into_iter()
                .map(|kind| kind.trim().to_owned())
                .filter(|kind| !kind.is_empty())
                .collect(),
            status_field_id: status_field_id
                .map(|field| field.trim().to_owned())
                .filter(|field| !field.is_empty()),
            last_sync_at: None,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs an integration from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedIntegrationData) -> Self {
        Self {
            id: data.id,
            remote_system: data.remote_system,
            remote_project_id: data.remote_project_id,
            remote_project_name: data.remote_project_name,
            local_board_id: data.local_board_id,
            field_mappings: data.field_mappings,
            type_filter: data.type_filter,
            status_field_id: data.status_field_id,
            last_sync_at: data.last_sync_at,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the integration identifier.
    #[must_use]
    pub const fn id(&self) -> IntegrationId {
        self.id
    }

    /// Returns the remote tracker.
    #[must_use]
    pub const fn remote_system(&self) -> RemoteSystem {
        self.remote_system
    }

    /// Returns the remote project identifier.
    #[must_use]
    pub fn remote_project_id(&self) -> &str {
        &self.remote_project_id
    }

    /// Returns the remote project display name.
    #[must_use]
    pub fn remote_project_name(&self) -> &str {
        &self.remote_project_name
    }

    /// Returns the board this integration populates.
    #[must_use]
    pub const fn local_board_id(&self) -> BoardId {
        self.local_board_id
    }

    /// Returns all field mappings.
    #[must_use]
    pub fn field_mappings(&self) -> &[FieldMapping] {
        &self.field_mappings
    }

    /// Returns the remote item types to import. Empty means all types.
    #[must_use]
    pub fn type_filter(&self) -> &[String] {
        &self.type_filter
    }

    /// Reports whether a remote item type passes the type filter.
    ///
    /// Comparison ignores ASCII case. Items without a type pass only when
    /// the filter is empty.
    #[must_use]
    pub fn accepts_item_type(&self, item_type: Option<&str>) -> bool {
        if self.type_filter.is_empty() {
            return true;
        }
        item_type.is_some_and(|kind| {
            self.type_filter
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(kind.trim()))
        })
    }

    /// Returns the explicitly configured status field, if any.
    #[must_use]
    pub fn status_field_id(&self) -> Option<&str> {
        self.status_field_id.as_deref()
    }

    /// Returns the mapping for the local status attribute, if configured.
    #[must_use]
    pub fn status_mapping(&self) -> Option<&FieldMapping> {
        self.field_mappings
            .iter()
            .find(|mapping| mapping.local_field() == LocalField::Status)
    }

    /// Returns the remote field written on push-back.
    ///
    /// Prefers the configured status field and falls back to the status
    /// mapping's remote field.
    #[must_use]
    pub fn push_back_field_id(&self) -> Option<&str> {
        self.status_field_id()
            .or_else(|| self.status_mapping().map(FieldMapping::remote_field_id))
    }

    /// Returns the last successful sync time.
    #[must_use]
    pub const fn last_sync_at(&self) -> Option<DateTime<Utc>> {
        self.last_sync_at
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Records a completed sync run.
    pub fn record_sync(&mut self, at: DateTime<Utc>) {
        self.last_sync_at = Some(at);
        self.updated_at = at;
    }
}
