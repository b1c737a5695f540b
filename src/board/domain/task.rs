//! Task aggregate root and the values it is built from.

use super::{BoardDomainError, BoardId, RemoteTaskMetadata, TaskId, TaskStatus};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Normalized user-facing task text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskContent {
    title: String,
    description: Option<String>,
}

impl TaskContent {
    /// Creates task content with a required title.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyTaskTitle`] if the title is blank.
    pub fn new(title: impl Into<String>) -> Result<Self, BoardDomainError> {
        let raw_title = title.into();
        let normalized_title = raw_title.trim();
        if normalized_title.is_empty() {
            return Err(BoardDomainError::EmptyTaskTitle);
        }

        Ok(Self {
            title: normalized_title.to_owned(),
            description: None,
        })
    }

    /// Sets the description. Blank descriptions are stored as absent.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let value = description.into();
        let normalized = value.trim();
        self.description = (!normalized.is_empty()).then_some(normalized.to_owned());
        self
    }

    /// Returns the task title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the task description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Remote-side state of an item, already translated into local terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRevision {
    /// Title and description as they read on the remote side.
    pub content: TaskContent,
    /// Local status resolved through the field mapping.
    pub status: TaskStatus,
    /// Remote item type or kind.
    pub remote_item_type: Option<String>,
    /// Raw remote status value before mapping.
    pub remote_status_value: Option<String>,
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    board_id: BoardId,
    content: TaskContent,
    status: TaskStatus,
    remote: Option<RemoteTaskMetadata>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Board the task belongs to.
    pub board_id: BoardId,
    /// Persisted title and description.
    pub content: TaskContent,
    /// Persisted status.
    pub status: TaskStatus,
    /// Persisted remote link, if any.
    pub remote: Option<RemoteTaskMetadata>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a purely local task.
    #[must_use]
    pub fn new(
        board_id: BoardId,
        content: TaskContent,
        status: TaskStatus,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            board_id,
            content,
            status,
            remote: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Creates a task mirroring a remote item.
    #[must_use]
    pub fn new_from_remote(
        board_id: BoardId,
        content: TaskContent,
        status: TaskStatus,
        remote: RemoteTaskMetadata,
        clock: &impl Clock,
    ) -> Self {
        let mut task = Self::new(board_id, content, status, clock);
        task.remote = Some(remote);
        task
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            board_id: data.board_id,
            content: data.content,
            status: data.status,
            remote: data.remote,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning board.
    #[must_use]
    pub const fn board_id(&self) -> BoardId {
        self.board_id
    }

    /// Returns the title and description.
    #[must_use]
    pub const fn content(&self) -> &TaskContent {
        &self.content
    }

    /// Returns the task title.
    #[must_use]
    pub fn title(&self) -> &str {
        self.content.title()
    }

    /// Returns the task description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.content.description()
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the remote link, if the task was pulled from a remote project.
    #[must_use]
    pub const fn remote(&self) -> Option<&RemoteTaskMetadata> {
        self.remote.as_ref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Reports whether title, description, or status differ from the given
    /// values.
    #[must_use]
    pub fn differs_from(&self, content: &TaskContent, status: TaskStatus) -> bool {
        self.content != *content || self.status != status
    }

    /// Applies a pulled remote revision.
    ///
    /// Returns `false` and leaves the task untouched when nothing the board
    /// shows would change. Otherwise overwrites the differing fields, bumps
    /// the remote version and refreshes the sync timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::NotRemoteLinked`] for local-only tasks.
    pub fn apply_remote_revision(
        &mut self,
        revision: RemoteRevision,
        clock: &impl Clock,
    ) -> Result<bool, BoardDomainError> {
        let task_id = self.id;
        let changed = self.differs_from(&revision.content, revision.status);
        let Some(remote) = self.remote.as_mut() else {
            return Err(BoardDomainError::NotRemoteLinked(task_id));
        };
        if !changed {
            return Ok(false);
        }

        let timestamp = clock.utc();
        remote.record_pull(
            revision.remote_item_type,
            revision.remote_status_value,
            timestamp,
        );
        self.content = revision.content;
        self.status = revision.status;
        self.updated_at = timestamp;
        Ok(true)
    }

    /// Records a status that was successfully written to the remote side.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::NotRemoteLinked`] for local-only tasks.
    pub fn record_push_back(
        &mut self,
        status: TaskStatus,
        remote_value: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<(), BoardDomainError> {
        let task_id = self.id;
        let remote = self
            .remote
            .as_mut()
            .ok_or(BoardDomainError::NotRemoteLinked(task_id))?;
        let timestamp = clock.utc();
        remote.record_push(remote_value.into(), timestamp);
        self.status = status;
        self.updated_at = timestamp;
        Ok(())
    }
}
