//! In-memory task repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::board::{
    domain::{BoardId, Task, TaskId},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use crate::integration::domain::IntegrationId;

/// Thread-safe in-memory task repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

type RemoteKey = (IntegrationId, String);

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
    board_index: HashMap<BoardId, Vec<TaskId>>,
    remote_index: HashMap<RemoteKey, TaskId>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> TaskRepositoryResult<RwLockReadGuard<'_, InMemoryTaskState>> {
        self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> TaskRepositoryResult<RwLockWriteGuard<'_, InMemoryTaskState>> {
        self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

fn remote_key(task: &Task) -> Option<RemoteKey> {
    task.remote()
        .map(|remote| (remote.integration_id(), remote.remote_item_id().to_owned()))
}

fn duplicate_remote_error(key: RemoteKey) -> TaskRepositoryError {
    let (integration_id, remote_item_id) = key;
    TaskRepositoryError::DuplicateRemoteItem {
        integration_id,
        remote_item_id,
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }

        let key = remote_key(task);
        if let Some(existing_key) = key.as_ref()
            && state.remote_index.contains_key(existing_key)
        {
            return Err(duplicate_remote_error(existing_key.clone()));
        }

        if let Some(new_key) = key {
            state.remote_index.insert(new_key, task.id());
        }
        state
            .board_index
            .entry(task.board_id())
            .or_default()
            .push(task.id());
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;

        let old_task = state
            .tasks
            .get(&task.id())
            .ok_or(TaskRepositoryError::NotFound(task.id()))?
            .clone();

        let old_key = remote_key(&old_task);
        let new_key = remote_key(task);
        if old_key != new_key {
            if let Some(candidate) = new_key.as_ref()
                && state
                    .remote_index
                    .get(candidate)
                    .is_some_and(|owner| *owner != task.id())
            {
                return Err(duplicate_remote_error(candidate.clone()));
            }
            if let Some(stale) = old_key {
                state.remote_index.remove(&stale);
            }
            if let Some(fresh) = new_key {
                state.remote_index.insert(fresh, task.id());
            }
        }

        if old_task.board_id() != task.board_id() {
            if let Some(ids) = state.board_index.get_mut(&old_task.board_id()) {
                ids.retain(|id| *id != task.id());
            }
            state
                .board_index
                .entry(task.board_id())
                .or_default()
                .push(task.id());
        }

        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.read()?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn find_by_board(&self, board_id: BoardId) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.read()?;
        let tasks = state
            .board_index
            .get(&board_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| state.tasks.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default();
        Ok(tasks)
    }

    async fn find_by_remote_item(
        &self,
        integration_id: IntegrationId,
        remote_item_id: &str,
    ) -> TaskRepositoryResult<Option<Task>> {
        let state = self.read()?;
        let key = (integration_id, remote_item_id.to_owned());
        Ok(state
            .remote_index
            .get(&key)
            .and_then(|task_id| state.tasks.get(task_id))
            .cloned())
    }
}
