//! Diesel row models for integration persistence.

use super::schema::integrations;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for integrations.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = integrations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct IntegrationRow {
    /// Integration identifier.
    pub id: uuid::Uuid,
    /// Remote tracker discriminator.
    pub remote_system: String,
    /// Remote project identifier.
    pub remote_project_id: String,
    /// Remote project display name.
    pub remote_project_name: String,
    /// Board the integration populates.
    pub local_board_id: uuid::Uuid,
    /// Field mappings JSON payload.
    pub field_mappings: Value,
    /// Type filter JSON payload.
    pub type_filter: Value,
    /// Remote field written on push-back.
    pub status_field_id: Option<String>,
    /// Last successful sync.
    pub last_sync_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for integrations.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = integrations)]
pub struct NewIntegrationRow {
    /// Integration identifier.
    pub id: uuid::Uuid,
    /// Remote tracker discriminator.
    pub remote_system: String,
    /// Remote project identifier.
    pub remote_project_id: String,
    /// Remote project display name.
    pub remote_project_name: String,
    /// Board the integration populates.
    pub local_board_id: uuid::Uuid,
    /// Field mappings JSON payload.
    pub field_mappings: Value,
    /// Type filter JSON payload.
    pub type_filter: Value,
    /// Remote field written on push-back.
    pub status_field_id: Option<String>,
    /// Last successful sync.
    pub last_sync_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Changeset for integration updates.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = integrations)]
#[diesel(treat_none_as_null = true)]
pub struct IntegrationChangeset {
    /// Remote project display name.
    pub remote_project_name: String,
    /// Field mappings JSON payload.
    pub field_mappings: Value,
    /// Type filter JSON payload.
    pub type_filter: Value,
    /// Remote field written on push-back.
    pub status_field_id: Option<String>,
    /// Last successful sync.
    pub last_sync_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
