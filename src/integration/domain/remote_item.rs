//! Remote items as reported by a connector.

use serde::{Deserialize, Serialize};

/// One remote work item, normalized across trackers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteItem {
    /// Remote item identifier, unique within the remote project.
    pub id: String,
    /// Remote title.
    pub title: String,
    /// Remote description or body.
    pub description: Option<String>,
    /// Raw value of the remote status field.
    pub status_value: Option<String>,
    /// Remote item type or kind (issue, pull request, bug, task).
    pub item_type: Option<String>,
}

impl RemoteItem {
    /// Creates an item with its identifier and title.
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            status_value: None,
            item_type: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the raw status value.
    #[must_use]
    pub fn with_status(mut self, status_value: impl Into<String>) -> Self {
        self.status_value = Some(status_value.into());
        self
    }

    /// Sets the item type.
    #[must_use]
    pub fn with_item_type(mut self, item_type: impl Into<String>) -> Self {
        self.item_type = Some(item_type.into());
        self
    }
}
