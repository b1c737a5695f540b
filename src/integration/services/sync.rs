//! Sync orchestration: pull remote items into board tasks.
//!
//! [`SyncService`] reconciles the full remote item list against the tasks of
//! the integration's board. Runs are idempotent: a second run over unchanged
//! remote data writes nothing. Items are reconciled independently, so one
//! failing item never aborts the run.

use super::{SyncConfig, SyncRunGuard, SyncStatusBoard};
use crate::board::{
    domain::{
        Board, BoardDomainError, BoardName, RemoteRevision, RemoteTaskMetadata, Task, TaskContent,
    },
    ports::{BoardRepository, BoardRepositoryError, TaskRepository, TaskRepositoryError},
};
use crate::integration::{
    domain::{
        FieldMapping, Integration, IntegrationDomainError, IntegrationId, NewIntegration,
        RemoteItem, RemoteSystem, SyncResult, resolve_local_status, suggest_field_mapping,
    },
    ports::{
        ConnectorError, IntegrationRepository, IntegrationRepositoryError, RemoteConnector,
        RemoteConnectors,
    },
};
use futures::stream::{self, StreamExt};
use mockable::Clock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;

/// Errors returned by sync and import operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// No integration has the identifier.
    #[error("integration not found: {0}")]
    IntegrationNotFound(IntegrationId),

    /// Another run of the same integration holds the latch.
    #[error("sync already in progress for integration {0}")]
    AlreadyInProgress(IntegrationId),

    /// No connector is registered for the integration's tracker.
    #[error("no connector configured for {0}")]
    ConnectorNotConfigured(RemoteSystem),

    /// The remote fetch failed; the run was aborted.
    #[error(transparent)]
    Connector(#[from] ConnectorError),

    /// Integration registry failure.
    #[error(transparent)]
    Registry(#[from] IntegrationRepositoryError),

    /// Task store failure.
    #[error(transparent)]
    Tasks(#[from] TaskRepositoryError),

    /// Board store failure.
    #[error(transparent)]
    Board(#[from] BoardRepositoryError),

    /// Board validation failed.
    #[error(transparent)]
    BoardDomain(#[from] BoardDomainError),

    /// Integration validation failed.
    #[error(transparent)]
    Domain(#[from] IntegrationDomainError),

    /// The project was imported but its first sync failed. The board and
    /// integration exist; retry with [`SyncService::sync`].
    #[error("initial sync of integration {integration_id} failed: {source}")]
    InitialSyncFailed {
        /// The integration created by the import.
        integration_id: IntegrationId,
        /// Why the first sync failed.
        source: Box<SyncError>,
    },
}

/// Result type for sync service operations.
pub type SyncServiceResult<T> = Result<T, SyncError>;

/// Request payload for importing a remote project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportProjectRequest {
    remote_system: RemoteSystem,
    remote_project_id: String,
    remote_project_name: String,
    field_mappings: Vec<FieldMapping>,
    type_filter: Vec<String>,
    status_field_id: Option<String>,
}

impl ImportProjectRequest {
    /// Creates a request for a remote project.
    #[must_use]
    pub fn new(
        remote_system: RemoteSystem,
        remote_project_id: impl Into<String>,
        remote_project_name: impl Into<String>,
    ) -> Self {
        Self {
            remote_system,
            remote_project_id: remote_project_id.into(),
            remote_project_name: remote_project_name.into(),
            field_mappings: Vec::new(),
            type_filter: Vec::new(),
            status_field_id: None,
        }
    }

    /// Adds a confirmed field mapping.
    #[must_use]
    pub fn with_field_mapping(mut self, mapping: FieldMapping) -> Self {
        self.field_mappings.push(mapping);
        self
    }

    /// Restricts the import to the given remote item types.
    #[must_use]
    pub fn with_type_filter(mut self, types: impl IntoIterator<Item = String>) -> Self {
        self.type_filter = types.into_iter().collect();
        self
    }

    /// Sets the remote field written on push-back.
    #[must_use]
    pub fn with_status_field(mut self, field_id: impl Into<String>) -> Self {
        self.status_field_id = Some(field_id.into());
        self
    }
}

/// Outcome of a successful import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedProject {
    /// Stored integration, including the first sync time.
    pub integration: Integration,
    /// Board created for the project.
    pub board: Board,
    /// Result of the first sync.
    pub initial_sync: SyncResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ItemOutcome {
    Created,
    Updated,
    Unchanged,
}

#[derive(Debug, Error)]
enum ItemError {
    #[error(transparent)]
    Domain(#[from] BoardDomainError),
    #[error(transparent)]
    Tasks(#[from] TaskRepositoryError),
}

/// Pulls remote items into board tasks and imports remote projects.
#[derive(Clone)]
pub struct SyncService<I, T, B, C>
where
    I: IntegrationRepository,
    T: TaskRepository,
    B: BoardRepository,
    C: Clock + Send + Sync,
{
    integrations: Arc<I>,
    tasks: Arc<T>,
    boards: Arc<B>,
    connectors: RemoteConnectors,
    status: Arc<SyncStatusBoard>,
    clock: Arc<C>,
    config: SyncConfig,
}

impl<I, T, B, C> SyncService<I, T, B, C>
where
    I: IntegrationRepository,
    T: TaskRepository,
    B: BoardRepository,
    C: Clock + Send + Sync,
{
    /// Creates a sync service with default configuration and a private
    /// status board.
    #[must_use]
    pub fn new(
        integrations: Arc<I>,
        tasks: Arc<T>,
        boards: Arc<B>,
        connectors: RemoteConnectors,
        clock: Arc<C>,
    ) -> Self {
        Self {
            integrations,
            tasks,
            boards,
            connectors,
            status: Arc::new(SyncStatusBoard::new()),
            clock,
            config: SyncConfig::default(),
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub const fn with_config(mut self, config: SyncConfig) -> Self {
        self.config = config;
        self
    }

    /// Publishes status through a shared board.
    #[must_use]
    pub fn with_status_board(mut self, status: Arc<SyncStatusBoard>) -> Self {
        self.status = status;
        self
    }

    /// Returns the status board this service publishes to.
    #[must_use]
    pub const fn status_board(&self) -> &Arc<SyncStatusBoard> {
        &self.status
    }

    /// Runs one sync of an integration.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::IntegrationNotFound`],
    /// [`SyncError::ConnectorNotConfigured`], or
    /// [`SyncError::AlreadyInProgress`] before any work starts. Returns
    /// [`SyncError::Connector`] when the fetch fails and repository errors
    /// when loading tasks or recording the run fails; in those cases the
    /// status board carries the error. Per-item failures are reported in
    /// [`SyncResult::errors`] instead. An integration deleted while the run
    /// is in flight still yields the result; its `last_sync_at` is not
    /// recorded.
    pub async fn sync(&self, integration_id: IntegrationId) -> SyncServiceResult<SyncResult> {
        let mut integration = self
            .integrations
            .find_by_id(integration_id)
            .await?
            .ok_or(SyncError::IntegrationNotFound(integration_id))?;
        let connector = Arc::clone(
            self.connectors
                .get(integration.remote_system())
                .ok_or(SyncError::ConnectorNotConfigured(integration.remote_system()))?,
        );
        let guard = self
            .status
            .try_begin(integration_id)
            .ok_or(SyncError::AlreadyInProgress(integration_id))?;

        tracing::info!(
            %integration_id,
            remote_system = %integration.remote_system(),
            remote_project_id = integration.remote_project_id(),
            "sync started"
        );
        let outcome = self.run(&mut integration, connector.as_ref()).await;
        self.finish(guard, &integration, outcome)
    }

    async fn run(
        &self,
        integration: &mut Integration,
        connector: &dyn RemoteConnector,
    ) -> SyncServiceResult<SyncResult> {
        let items = connector.fetch_items(integration).await?;
        let tasks = self.tasks.find_by_board(integration.local_board_id()).await?;

        let result = self.reconcile(integration, items, tasks).await;

        integration.record_sync(self.clock.utc());
        match self.integrations.update(integration).await {
            Ok(()) => {}
            Err(IntegrationRepositoryError::NotFound(integration_id)) => {
                tracing::warn!(
                    %integration_id,
                    "integration deleted during sync; keeping the run result"
                );
            }
            Err(err) => return Err(err.into()),
        }
        Ok(result)
    }

    fn finish(
        &self,
        guard: SyncRunGuard,
        integration: &Integration,
        outcome: SyncServiceResult<SyncResult>,
    ) -> SyncServiceResult<SyncResult> {
        let integration_id = integration.id();
        match outcome {
            Ok(result) => {
                tracing::info!(
                    %integration_id,
                    created = result.created,
                    updated = result.updated,
                    unchanged = result.unchanged,
                    failed = result.errors.len(),
                    "sync finished"
                );
                let at = integration.last_sync_at().unwrap_or_else(|| self.clock.utc());
                guard.complete(result.clone(), at);
                Ok(result)
            }
            Err(err) => {
                tracing::warn!(%integration_id, error = %err, "sync aborted");
                guard.fail(err.to_string());
                Err(err)
            }
        }
    }

    async fn reconcile(
        &self,
        integration: &Integration,
        items: Vec<RemoteItem>,
        tasks: Vec<Task>,
    ) -> SyncResult {
        let integration_id = integration.id();
        let mut linked: HashMap<String, Task> = tasks
            .into_iter()
            .filter_map(|task| {
                let key = task
                    .remote()
                    .filter(|remote| remote.integration_id() == integration_id)?
                    .remote_item_id()
                    .to_owned();
                Some((key, task))
            })
            .collect();

        let mut result = SyncResult::default();
        let mut seen = HashSet::new();
        let mut work = Vec::with_capacity(items.len());
        for item in items {
            if !seen.insert(item.id.clone()) {
                tracing::warn!(%integration_id, remote_item_id = %item.id, "duplicate remote item");
                result
                    .errors
                    .push(format!("remote item {}: duplicate in remote response", item.id));
                continue;
            }
            let existing = linked.remove(&item.id);
            work.push((item, existing));
        }

        let outcomes: Vec<(String, Result<ItemOutcome, ItemError>)> = stream::iter(work)
            .map(|(item, existing)| self.reconcile_item(integration, item, existing))
            .buffer_unordered(self.config.effective_concurrency())
            .collect()
            .await;

        for (remote_item_id, outcome) in outcomes {
            match outcome {
                Ok(ItemOutcome::Created) => result.created += 1,
                Ok(ItemOutcome::Updated) => result.updated += 1,
                Ok(ItemOutcome::Unchanged) => result.unchanged += 1,
                Err(err) => {
                    tracing::warn!(
                        %integration_id,
                        %remote_item_id,
                        error = %err,
                        "remote item failed to sync"
                    );
                    result
                        .errors
                        .push(format!("remote item {remote_item_id}: {err}"));
                }
            }
        }
        result
    }

    async fn reconcile_item(
        &self,
        integration: &Integration,
        item: RemoteItem,
        existing: Option<Task>,
    ) -> (String, Result<ItemOutcome, ItemError>) {
        let remote_item_id = item.id.clone();
        let outcome = self.apply_item(integration, item, existing).await;
        if let Ok(kind) = outcome.as_ref() {
            tracing::debug!(
                integration_id = %integration.id(),
                %remote_item_id,
                outcome = ?kind,
                "remote item reconciled"
            );
        }
        (remote_item_id, outcome)
    }

    async fn apply_item(
        &self,
        integration: &Integration,
        item: RemoteItem,
        existing: Option<Task>,
    ) -> Result<ItemOutcome, ItemError> {
        let RemoteItem {
            id,
            title,
            description,
            status_value,
            item_type,
        } = item;
        let status = resolve_local_status(
            integration.status_mapping(),
            status_value.as_deref(),
            self.config.default_status,
        );
        let mut content = TaskContent::new(title)?;
        if let Some(text) = description {
            content = content.with_description(text);
        }

        let Some(mut task) = existing else {
            let remote = RemoteTaskMetadata::linked(
                integration.id(),
                id,
                item_type,
                status_value,
                &*self.clock,
            )?;
            let created = Task::new_from_remote(
                integration.local_board_id(),
                content,
                status,
                remote,
                &*self.clock,
            );
            self.tasks.store(&created).await?;
            return Ok(ItemOutcome::Created);
        };

        let revision = RemoteRevision {
            content,
            status,
            remote_item_type: item_type,
            remote_status_value: status_value,
        };
        if !task.apply_remote_revision(revision, &*self.clock)? {
            return Ok(ItemOutcome::Unchanged);
        }
        self.tasks.update(&task).await?;
        Ok(ItemOutcome::Updated)
    }

    /// Imports a remote project: creates a board, stores the integration,
    /// and runs the first sync.
    ///
    /// # Errors
    ///
    /// Returns validation or repository errors when nothing could be
    /// created. Returns [`SyncError::InitialSyncFailed`] when the board and
    /// integration were stored but the first sync failed.
    pub async fn import_project(
        &self,
        request: ImportProjectRequest,
    ) -> SyncServiceResult<ImportedProject> {
        let ImportProjectRequest {
            remote_system,
            remote_project_id,
            remote_project_name,
            field_mappings,
            type_filter,
            status_field_id,
        } = request;

        for mapping in &field_mappings {
            mapping.validate()?;
        }
        let board_name = BoardName::new(remote_project_name.clone())?;
        if self.connectors.get(remote_system).is_none() {
            return Err(SyncError::ConnectorNotConfigured(remote_system));
        }

        let board = Board::new(board_name, &*self.clock);
        let integration = Integration::new(
            NewIntegration {
                remote_system,
                remote_project_id,
                remote_project_name,
                local_board_id: board.id(),
                field_mappings,
                type_filter,
                status_field_id,
            },
            &*self.clock,
        )?;

        self.boards.store(&board).await?;
        self.integrations.store(&integration).await?;
        let integration_id = integration.id();
        tracing::info!(
            %integration_id,
            board_id = %board.id(),
            remote_system = %remote_system,
            "project imported"
        );

        let initial_sync =
            self.sync(integration_id)
                .await
                .map_err(|err| SyncError::InitialSyncFailed {
                    integration_id,
                    source: Box::new(err),
                })?;
        let stored = self
            .integrations
            .find_by_id(integration_id)
            .await?
            .unwrap_or(integration);

        Ok(ImportedProject {
            integration: stored,
            board,
            initial_sync,
        })
    }

    /// Suggests a status mapping for a remote field from its options.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::ConnectorNotConfigured`] or
    /// [`SyncError::Connector`] when the options cannot be listed.
    pub async fn suggest_mapping(
        &self,
        remote_system: RemoteSystem,
        remote_project_id: &str,
        remote_field_id: &str,
        remote_field_name: &str,
        item_types: &[String],
    ) -> SyncServiceResult<FieldMapping> {
        let connector = self
            .connectors
            .get(remote_system)
            .ok_or(SyncError::ConnectorNotConfigured(remote_system))?;
        let options = connector
            .list_status_options(remote_project_id, remote_field_id, item_types)
            .await?;
        Ok(suggest_field_mapping(
            remote_field_id,
            remote_field_name,
            &options,
        ))
    }
}
