//! Sync engine configuration.

use crate::board::domain::TaskStatus;
use serde::Deserialize;

const DEFAULT_MAX_CONCURRENT_ITEMS: usize = 8;

/// Tunables for [`super::SyncService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Status assigned to remote items whose status value is unmapped.
    pub default_status: TaskStatus,
    /// Upper bound on remote items reconciled concurrently.
    pub max_concurrent_items: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            default_status: TaskStatus::Backlog,
            max_concurrent_items: DEFAULT_MAX_CONCURRENT_ITEMS,
        }
    }
}

impl SyncConfig {
    /// Configuration reconciling one item at a time.
    #[must_use]
    pub fn sequential() -> Self {
        Self {
            max_concurrent_items: 1,
            ..Self::default()
        }
    }

    /// Sets the fallback status for unmapped remote values.
    #[must_use]
    pub const fn with_default_status(mut self, status: TaskStatus) -> Self {
        self.default_status = status;
        self
    }

    /// Sets the concurrency bound.
    #[must_use]
    pub const fn with_max_concurrent_items(mut self, limit: usize) -> Self {
        self.max_concurrent_items = limit;
        self
    }

    /// Returns the concurrency bound, never below one.
    #[must_use]
    pub const fn effective_concurrency(&self) -> usize {
        if self.max_concurrent_items == 0 {
            1
        } else {
            self.max_concurrent_items
        }
    }
}
