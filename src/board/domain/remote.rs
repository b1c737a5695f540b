//! Remote provenance carried by tasks pulled from an external project.

use super::BoardDomainError;
use crate::integration::domain::IntegrationId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Link between a local task and the remote item it mirrors.
///
/// `(integration_id, remote_item_id)` is the natural join key: at most one
/// task may carry a given pair. The version counters are bookkeeping only;
/// nothing compares them before overwriting, so concurrent pull-sync and
/// push-back resolve as last-writer-wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteTaskMetadata {
    integration_id: IntegrationId,
    remote_item_id: String,
    remote_item_type: Option<String>,
    remote_status_value: Option<String>,
    local_version: u64,
    remote_version: u64,
    last_synced_at: DateTime<Utc>,
}

impl RemoteTaskMetadata {
    /// Creates fresh metadata for a newly imported item.
    ///
    /// Both version counters start at zero. The identifier is kept exactly
    /// as the remote reported it so later fetches and push-back use the same
    /// key.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyRemoteItemId`] when the remote item
    /// identifier is blank.
    pub fn linked(
        integration_id: IntegrationId,
        remote_item_id: impl Into<String>,
        remote_item_type: Option<String>,
        remote_status_value: Option<String>,
        clock: &impl Clock,
    ) -> Result<Self, BoardDomainError> {
        let raw_id = remote_item_id.into();
        if raw_id.trim().is_empty() {
            return Err(BoardDomainError::EmptyRemoteItemId);
        }

        Ok(Self {
            integration_id,
            remote_item_id: raw_id,
            remote_item_type,
            remote_status_value,
            local_version: 0,
            remote_version: 0,
            last_synced_at: clock.utc(),
        })
    }

    /// Returns the owning integration.
    #[must_use]
    pub const fn integration_id(&self) -> IntegrationId {
        self.integration_id
    }

    /// Returns the remote item identifier.
    #[must_use]
    pub fn remote_item_id(&self) -> &str {
        &self.remote_item_id
    }

    /// Returns the remote item type or kind, if known.
    #[must_use]
    pub fn remote_item_type(&self) -> Option<&str> {
        self.remote_item_type.as_deref()
    }

    /// Returns the last remote status value seen or written.
    #[must_use]
    pub fn remote_status_value(&self) -> Option<&str> {
        self.remote_status_value.as_deref()
    }

    /// Returns the number of successful push-backs.
    #[must_use]
    pub const fn local_version(&self) -> u64 {
        self.local_version
    }

    /// Returns the number of pull-sync updates applied.
    #[must_use]
    pub const fn remote_version(&self) -> u64 {
        self.remote_version
    }

    /// Returns the last time this link was reconciled in either direction.
    #[must_use]
    pub const fn last_synced_at(&self) -> DateTime<Utc> {
        self.last_synced_at
    }

    pub(super) fn record_pull(
        &mut self,
        remote_item_type: Option<String>,
        remote_status_value: Option<String>,
        at: DateTime<Utc>,
    ) {
        self.remote_item_type = remote_item_type;
        self.remote_status_value = remote_status_value;
        self.remote_version += 1;
        self.last_synced_at = at;
    }

    pub(super) fn record_push(&mut self, remote_status_value: String, at: DateTime<Utc>) {
        self.remote_status_value = Some(remote_status_value);
        self.local_version += 1;
        self.last_synced_at = at;
    }
}
