//! Push-back: write a local status change to the remote item.

use crate::board::{
    domain::{BoardDomainError, Task, TaskId, TaskStatus},
    ports::{TaskRepository, TaskRepositoryError},
};
use crate::integration::{
    domain::{IntegrationId, RemoteSystem},
    ports::{ConnectorError, IntegrationRepository, IntegrationRepositoryError, RemoteConnectors},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Errors returned by [`PushBackService::push_status_change`].
#[derive(Debug, Error)]
pub enum PushBackError {
    /// The task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The task was never pulled from a remote project.
    #[error("task {0} is not linked to a remote item")]
    NoRemoteMetadata(TaskId),

    /// The task's integration no longer exists.
    #[error("integration not found: {0}")]
    IntegrationNotFound(IntegrationId),

    /// The integration has no status mapping or no field to write.
    #[error("integration {0} has no status mapping")]
    NoStatusMapping(IntegrationId),

    /// The status has no reverse entry; nothing was sent.
    #[error("status {status} has no remote value in integration {integration_id}")]
    UnmappedStatus {
        /// Integration whose mapping was consulted.
        integration_id: IntegrationId,
        /// Status without a reverse entry.
        status: TaskStatus,
    },

    /// No connector is registered for the integration's tracker.
    #[error("no connector configured for {0}")]
    ConnectorNotConfigured(RemoteSystem),

    /// The remote write failed; the local task is unchanged.
    #[error(transparent)]
    Connector(#[from] ConnectorError),

    /// Task store failure.
    #[error(transparent)]
    Tasks(#[from] TaskRepositoryError),

    /// Integration registry failure.
    #[error(transparent)]
    Registry(#[from] IntegrationRepositoryError),

    /// Task state rejected the change.
    #[error(transparent)]
    Domain(#[from] BoardDomainError),
}

/// Result type for push-back operations.
pub type PushBackResult<T> = Result<T, PushBackError>;

/// Writes local status changes of remote-linked tasks back upstream.
#[derive(Clone)]
pub struct PushBackService<T, I, C>
where
    T: TaskRepository,
    I: IntegrationRepository,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    integrations: Arc<I>,
    connectors: RemoteConnectors,
    clock: Arc<C>,
}

impl<T, I, C> PushBackService<T, I, C>
where
    T: TaskRepository,
    I: IntegrationRepository,
    C: Clock + Send + Sync,
{
    /// Creates a push-back service.
    #[must_use]
    pub const fn new(
        tasks: Arc<T>,
        integrations: Arc<I>,
        connectors: RemoteConnectors,
        clock: Arc<C>,
    ) -> Self {
        Self {
            tasks,
            integrations,
            connectors,
            clock,
        }
    }

    /// Writes `status` to the remote item behind a task, then records it
    /// locally.
    ///
    /// The remote write happens first. When it fails, the task is left
    /// untouched. The sync latch is not consulted.
    ///
    /// # Errors
    ///
    /// Returns [`PushBackError`] naming the first step that failed. For
    /// [`PushBackError::UnmappedStatus`] no remote call is made.
    pub async fn push_status_change(
        &self,
        task_id: TaskId,
        status: TaskStatus,
    ) -> PushBackResult<Task> {
        let mut task = self
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or(PushBackError::TaskNotFound(task_id))?;
        let remote = task
            .remote()
            .ok_or(PushBackError::NoRemoteMetadata(task_id))?;
        let integration_id = remote.integration_id();
        let remote_item_id = remote.remote_item_id().to_owned();

        let integration = self
            .integrations
            .find_by_id(integration_id)
            .await?
            .ok_or(PushBackError::IntegrationNotFound(integration_id))?;
        let mapping = integration
            .status_mapping()
            .ok_or(PushBackError::NoStatusMapping(integration_id))?;
        let value = mapping
            .to_remote_value(status)
            .ok_or(PushBackError::UnmappedStatus {
                integration_id,
                status,
            })?
            .to_owned();
        let field_id = integration
            .push_back_field_id()
            .ok_or(PushBackError::NoStatusMapping(integration_id))?;
        let connector = self
            .connectors
            .get(integration.remote_system())
            .ok_or(PushBackError::ConnectorNotConfigured(
                integration.remote_system(),
            ))?;

        connector
            .update_field(
                integration.remote_project_id(),
                &remote_item_id,
                field_id,
                &value,
            )
            .await
            .inspect_err(|err| {
                tracing::warn!(
                    %task_id,
                    %integration_id,
                    %remote_item_id,
                    error = %err,
                    "status push-back failed"
                );
            })?;

        task.record_push_back(status, value, &*self.clock)?;
        self.tasks.update(&task).await?;
        tracing::info!(
            %task_id,
            %integration_id,
            %remote_item_id,
            status = %status,
            "status pushed to remote"
        );
        Ok(task)
    }
}
