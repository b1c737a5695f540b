//! Service layer for the integration registry.
//!
//! Provides [`IntegrationRegistryService`], which validates and stores
//! integrations and answers lookups.

use crate::board::domain::BoardId;
use crate::integration::{
    domain::{Integration, IntegrationDomainError, IntegrationId, NewIntegration},
    ports::{IntegrationRepository, IntegrationRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for registry operations.
#[derive(Debug, Error)]
pub enum IntegrationRegistryServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] IntegrationDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] IntegrationRepositoryError),
}

/// Result type for registry service operations.
pub type IntegrationRegistryServiceResult<T> = Result<T, IntegrationRegistryServiceError>;

/// Integration registration and lookup service.
#[derive(Clone)]
pub struct IntegrationRegistryService<R, C>
where
    R: IntegrationRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> IntegrationRegistryService<R, C>
where
    R: IntegrationRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new registry service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Validates and stores a new integration.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationRegistryServiceError::Domain`] when validation
    /// fails, or [`IntegrationRegistryServiceError::Repository`] when the
    /// board already has an integration or persistence fails.
    pub async fn register(
        &self,
        params: NewIntegration,
    ) -> IntegrationRegistryServiceResult<Integration> {
        let integration = Integration::new(params, &*self.clock)?;
        self.repository.store(&integration).await?;
        tracing::info!(
            integration_id = %integration.id(),
            board_id = %integration.local_board_id(),
            remote_system = %integration.remote_system(),
            "integration registered"
        );
        Ok(integration)
    }

    /// Finds an integration by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationRegistryServiceError::Repository`] when
    /// persistence lookup fails.
    pub async fn find_by_id(
        &self,
        id: IntegrationId,
    ) -> IntegrationRegistryServiceResult<Option<Integration>> {
        Ok(self.repository.find_by_id(id).await?)
    }

    /// Finds the integration populating a board.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationRegistryServiceError::Repository`] when
    /// persistence lookup fails.
    pub async fn find_by_board(
        &self,
        board_id: BoardId,
    ) -> IntegrationRegistryServiceResult<Option<Integration>> {
        Ok(self.repository.find_by_board(board_id).await?)
    }

    /// Returns every integration.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationRegistryServiceError::Repository`] when
    /// persistence lookup fails.
    pub async fn list_all(&self) -> IntegrationRegistryServiceResult<Vec<Integration>> {
        Ok(self.repository.list_all().await?)
    }

    /// Deletes an integration record. The board and its tasks remain.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationRepositoryError::NotFound`] through
    /// [`IntegrationRegistryServiceError::Repository`] when nothing was
    /// deleted, or a persistence failure.
    pub async fn delete(&self, id: IntegrationId) -> IntegrationRegistryServiceResult<()> {
        if !self.repository.delete(id).await? {
            return Err(IntegrationRepositoryError::NotFound(id).into());
        }
        tracing::info!(integration_id = %id, "integration deleted");
        Ok(())
    }
}
