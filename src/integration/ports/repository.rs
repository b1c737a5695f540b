//! Repository port for integration records.

use crate::board::domain::BoardId;
use crate::integration::domain::{Integration, IntegrationId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for integration repository operations.
pub type IntegrationRepositoryResult<T> = Result<T, IntegrationRepositoryError>;

/// Durable store of configured integrations.
#[async_trait]
pub trait IntegrationRepository: Send + Sync {
    /// Stores a new integration.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationRepositoryError::DuplicateIntegration`] when the
    /// identifier exists or
    /// [`IntegrationRepositoryError::DuplicateBoardIntegration`] when the
    /// board already has an integration.
    async fn store(&self, integration: &Integration) -> IntegrationRepositoryResult<()>;

    /// Persists changes to an existing integration.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationRepositoryError::NotFound`] when the integration
    /// does not exist.
    async fn update(&self, integration: &Integration) -> IntegrationRepositoryResult<()>;

    /// Finds an integration by identifier.
    async fn find_by_id(
        &self,
        id: IntegrationId,
    ) -> IntegrationRepositoryResult<Option<Integration>>;

    /// Finds the integration populating a board.
    async fn find_by_board(
        &self,
        board_id: BoardId,
    ) -> IntegrationRepositoryResult<Option<Integration>>;

    /// Returns every integration ordered by creation time.
    async fn list_all(&self) -> IntegrationRepositoryResult<Vec<Integration>>;

    /// Removes an integration record.
    ///
    /// Returns `false` when no record existed. Boards and tasks are never
    /// touched.
    async fn delete(&self, id: IntegrationId) -> IntegrationRepositoryResult<bool>;
}

/// Errors returned by integration repository implementations.
#[derive(Debug, Clone, Error)]
pub enum IntegrationRepositoryError {
    /// An integration with the same identifier already exists.
    #[error("duplicate integration identifier: {0}")]
    DuplicateIntegration(IntegrationId),

    /// The board is already linked to another integration.
    #[error("board {0} already has an integration")]
    DuplicateBoardIntegration(BoardId),

    /// The integration was not found.
    #[error("integration not found: {0}")]
    NotFound(IntegrationId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl IntegrationRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
