//! Per-integration sync latch and status publication.

use crate::integration::domain::{IntegrationId, SyncResult, SyncStatus};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::broadcast;

const UPDATE_CHANNEL_CAPACITY: usize = 64;

/// Status change pushed to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncStatusUpdate {
    /// Integration whose status changed.
    pub integration_id: IntegrationId,
    /// Status after the change.
    pub status: SyncStatus,
}

/// Shared, in-memory sync status for every integration.
///
/// Holds the per-integration latch that keeps two runs of the same
/// integration from overlapping. State is lost on restart.
#[derive(Debug)]
pub struct SyncStatusBoard {
    statuses: RwLock<HashMap<IntegrationId, SyncStatus>>,
    updates: broadcast::Sender<SyncStatusUpdate>,
}

impl Default for SyncStatusBoard {
    fn default() -> Self {
        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        Self {
            statuses: RwLock::default(),
            updates,
        }
    }
}

impl SyncStatusBoard {
    /// Creates an empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the latch for an integration.
    ///
    /// Returns `None` when a run already holds it. Check and set happen
    /// under one write lock.
    #[must_use]
    pub fn try_begin(self: &Arc<Self>, integration_id: IntegrationId) -> Option<SyncRunGuard> {
        let status = {
            let mut statuses = self.statuses.write().unwrap_or_else(PoisonError::into_inner);
            let entry = statuses.entry(integration_id).or_default();
            if entry.in_progress {
                return None;
            }
            entry.in_progress = true;
            entry.error = None;
            entry.clone()
        };
        self.publish(integration_id, status);
        Some(SyncRunGuard {
            board: Arc::clone(self),
            integration_id,
            finished: false,
        })
    }

    /// Returns the current status of an integration.
    #[must_use]
    pub fn snapshot(&self, integration_id: IntegrationId) -> SyncStatus {
        self.statuses
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&integration_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Reports whether a run currently holds the integration's latch.
    #[must_use]
    pub fn is_in_progress(&self, integration_id: IntegrationId) -> bool {
        self.snapshot(integration_id).in_progress
    }

    /// Subscribes to status changes published after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SyncStatusUpdate> {
        self.updates.subscribe()
    }

    fn finish(&self, integration_id: IntegrationId, apply: impl FnOnce(&mut SyncStatus)) {
        let status = {
            let mut statuses = self.statuses.write().unwrap_or_else(PoisonError::into_inner);
            let entry = statuses.entry(integration_id).or_default();
            entry.in_progress = false;
            apply(entry);
            entry.clone()
        };
        self.publish(integration_id, status);
    }

    fn publish(&self, integration_id: IntegrationId, status: SyncStatus) {
        // Sending fails only when nobody is subscribed.
        if self
            .updates
            .send(SyncStatusUpdate {
                integration_id,
                status,
            })
            .is_err()
        {
            tracing::trace!(%integration_id, "no sync status subscribers");
        }
    }
}

/// Latch held by one running sync.
///
/// Dropping the guard without calling [`SyncRunGuard::complete`] or
/// [`SyncRunGuard::fail`] releases the latch and keeps the previous result.
#[derive(Debug)]
pub struct SyncRunGuard {
    board: Arc<SyncStatusBoard>,
    integration_id: IntegrationId,
    finished: bool,
}

impl SyncRunGuard {
    /// Returns the integration this run belongs to.
    #[must_use]
    pub const fn integration_id(&self) -> IntegrationId {
        self.integration_id
    }

    /// Releases the latch and publishes a successful result.
    pub fn complete(mut self, result: SyncResult, at: DateTime<Utc>) {
        self.finished = true;
        self.board.finish(self.integration_id, |status| {
            status.last_sync_at = Some(at);
            status.last_result = Some(result);
            status.error = None;
        });
    }

    /// Releases the latch and publishes a failure.
    pub fn fail(mut self, message: impl Into<String>) {
        self.finished = true;
        let text = message.into();
        self.board.finish(self.integration_id, |status| {
            status.error = Some(text);
        });
    }
}

impl Drop for SyncRunGuard {
    fn drop(&mut self) {
        if !self.finished {
            self.board.finish(self.integration_id, |_| {});
        }
    }
}
