//! In-memory integration repository.

use crate::board::domain::BoardId;
use crate::integration::{
    domain::{Integration, IntegrationId},
    ports::{IntegrationRepository, IntegrationRepositoryError, IntegrationRepositoryResult},
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory integration repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIntegrationRepository {
    state: Arc<RwLock<InMemoryRegistryState>>,
}

#[derive(Debug, Default)]
struct InMemoryRegistryState {
    integrations: HashMap<IntegrationId, Integration>,
    board_index: HashMap<BoardId, IntegrationId>,
}

impl InMemoryIntegrationRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> IntegrationRepositoryError {
    IntegrationRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl IntegrationRepository for InMemoryIntegrationRepository {
    async fn store(&self, integration: &Integration) -> IntegrationRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;

        if state.integrations.contains_key(&integration.id()) {
            return Err(IntegrationRepositoryError::DuplicateIntegration(
                integration.id(),
            ));
        }
        if state.board_index.contains_key(&integration.local_board_id()) {
            return Err(IntegrationRepositoryError::DuplicateBoardIntegration(
                integration.local_board_id(),
            ));
        }

        state
            .board_index
            .insert(integration.local_board_id(), integration.id());
        state
            .integrations
            .insert(integration.id(), integration.clone());
        Ok(())
    }

    async fn update(&self, integration: &Integration) -> IntegrationRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;

        let stored_board = state
            .integrations
            .get(&integration.id())
            .ok_or(IntegrationRepositoryError::NotFound(integration.id()))?
            .local_board_id();

        if stored_board != integration.local_board_id() {
            if let Some(&owner) = state.board_index.get(&integration.local_board_id())
                && owner != integration.id()
            {
                return Err(IntegrationRepositoryError::DuplicateBoardIntegration(
                    integration.local_board_id(),
                ));
            }
            state.board_index.remove(&stored_board);
            state
                .board_index
                .insert(integration.local_board_id(), integration.id());
        }

        state
            .integrations
            .insert(integration.id(), integration.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: IntegrationId,
    ) -> IntegrationRepositoryResult<Option<Integration>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.integrations.get(&id).cloned())
    }

    async fn find_by_board(
        &self,
        board_id: BoardId,
    ) -> IntegrationRepositoryResult<Option<Integration>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .board_index
            .get(&board_id)
            .and_then(|id| state.integrations.get(id))
            .cloned())
    }

    async fn list_all(&self) -> IntegrationRepositoryResult<Vec<Integration>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut all: Vec<Integration> = state.integrations.values().cloned().collect();
        all.sort_by_key(Integration::created_at);
        Ok(all)
    }

    async fn delete(&self, id: IntegrationId) -> IntegrationRepositoryResult<bool> {
        let mut state = self.state.write().map_err(lock_error)?;
        let Some(removed) = state.integrations.remove(&id) else {
            return Ok(false);
        };
        state.board_index.remove(&removed.local_board_id());
        Ok(true)
    }
}
