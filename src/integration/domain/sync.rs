//! Values produced by sync runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of one sync run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncResult {
    /// Tasks created for previously unseen remote items.
    pub created: usize,
    /// Tasks overwritten with changed remote values.
    pub updated: usize,
    /// Remote items whose task already matched.
    pub unchanged: usize,
    /// One human-readable entry per failed remote item.
    pub errors: Vec<String>,
}

impl SyncResult {
    /// Total number of remote items the run looked at.
    #[must_use]
    pub fn processed(&self) -> usize {
        self.created + self.updated + self.unchanged + self.errors.len()
    }

    /// Reports whether every item succeeded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Transient per-integration sync state observed by the UI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncStatus {
    /// A run currently holds the integration's latch.
    pub in_progress: bool,
    /// Completion time of the last successful run.
    pub last_sync_at: Option<DateTime<Utc>>,
    /// Result of the last successful run.
    pub last_result: Option<SyncResult>,
    /// Failure message of the last aborted run.
    pub error: Option<String>,
}
