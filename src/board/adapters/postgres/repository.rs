//! `PostgreSQL` repository implementations for boards and tasks.

use super::{
    models::{BoardRow, NewBoardRow, NewTaskRow, TaskChangeset, TaskRow},
    schema::{boards, tasks},
};
use crate::board::{
    domain::{
        Board, BoardId, BoardName, PersistedTaskData, RemoteTaskMetadata, Task, TaskContent,
        TaskId, TaskStatus,
    },
    ports::{
        BoardRepository, BoardRepositoryError, BoardRepositoryResult, TaskRepository,
        TaskRepositoryError, TaskRepositoryResult,
    },
};
use crate::integration::domain::IntegrationId;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by board adapters.
pub type BoardPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: BoardPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: BoardPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let remote_key = task
            .remote()
            .map(|remote| (remote.integration_id(), remote.remote_item_id().to_owned()));
        let new_row = to_new_row(task)?;

        self.run_blocking(move |connection| {
            // Semantic pre-check only; the partial unique index still guards
            // the window between check and insert.
            if let Some((integration_id, remote_item_id)) = remote_key.as_ref()
                && find_task_by_remote_item(connection, *integration_id, remote_item_id)?
                    .is_some()
            {
                return Err(TaskRepositoryError::DuplicateRemoteItem {
                    integration_id: *integration_id,
                    remote_item_id: remote_item_id.clone(),
                });
            }

            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match (err, remote_key.as_ref()) {
                    (
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info),
                        Some((integration_id, remote_item_id)),
                    ) if is_remote_item_unique_violation(info.as_ref()) => {
                        TaskRepositoryError::DuplicateRemoteItem {
                            integration_id: *integration_id,
                            remote_item_id: remote_item_id.clone(),
                        }
                    }
                    (DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _), _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    (other, _) => TaskRepositoryError::persistence(other),
                })?;

            Ok(())
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let changeset = to_changeset(task)?;

        self.run_blocking(move |connection| {
            let affected = diesel::update(tasks::table.filter(tasks::id.eq(task_id.into_inner())))
                .set(&changeset)
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if affected == 0 {
                return Err(TaskRepositoryError::NotFound(task_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn find_by_board(&self, board_id: BoardId) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::board_id.eq(board_id.into_inner()))
                .order(tasks::created_at.asc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn find_by_remote_item(
        &self,
        integration_id: IntegrationId,
        remote_item_id: &str,
    ) -> TaskRepositoryResult<Option<Task>> {
        let lookup_item_id = remote_item_id.to_owned();
        self.run_blocking(move |connection| {
            let row = find_task_by_remote_item(connection, integration_id, &lookup_item_id)?;
            row.map(row_to_task).transpose()
        })
        .await
    }
}

fn to_new_row(task: &Task) -> TaskRepositoryResult<NewTaskRow> {
    Ok(NewTaskRow {
        id: task.id().into_inner(),
        board_id: task.board_id().into_inner(),
        title: task.title().to_owned(),
        description: task.description().map(str::to_owned),
        status: task.status().as_str().to_owned(),
        remote: remote_to_value(task.remote())?,
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    })
}

fn to_changeset(task: &Task) -> TaskRepositoryResult<TaskChangeset> {
    Ok(TaskChangeset {
        board_id: task.board_id().into_inner(),
        title: task.title().to_owned(),
        description: task.description().map(str::to_owned),
        status: task.status().as_str().to_owned(),
        remote: remote_to_value(task.remote())?,
        updated_at: task.updated_at(),
    })
}

fn remote_to_value(
    remote: Option<&RemoteTaskMetadata>,
) -> TaskRepositoryResult<Option<serde_json::Value>> {
    remote
        .map(serde_json::to_value)
        .transpose()
        .map_err(TaskRepositoryError::persistence)
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        board_id,
        title,
        description,
        status: persisted_status,
        remote: persisted_remote,
        created_at,
        updated_at,
    } = row;

    let mut content = TaskContent::new(title).map_err(TaskRepositoryError::persistence)?;
    if let Some(text) = description {
        content = content.with_description(text);
    }
    let status =
        TaskStatus::try_from(persisted_status.as_str()).map_err(TaskRepositoryError::persistence)?;
    let remote = persisted_remote
        .map(serde_json::from_value::<RemoteTaskMetadata>)
        .transpose()
        .map_err(TaskRepositoryError::persistence)?;

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(id),
        board_id: BoardId::from_uuid(board_id),
        content,
        status,
        remote,
        created_at,
        updated_at,
    }))
}

fn is_remote_item_unique_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| name == "idx_tasks_remote_item_unique")
}

fn find_task_by_remote_item(
    connection: &mut PgConnection,
    integration_id: IntegrationId,
    remote_item_id: &str,
) -> TaskRepositoryResult<Option<TaskRow>> {
    let query = diesel::sql_query(concat!(
        "SELECT id, board_id, title, description, status, remote, created_at, updated_at ",
        "FROM tasks ",
        "WHERE remote->>'integration_id' = $1 ",
        "AND remote->>'remote_item_id' = $2 ",
        "LIMIT 1",
    ))
    .bind::<diesel::sql_types::Text, _>(integration_id.to_string())
    .bind::<diesel::sql_types::Text, _>(remote_item_id);

    query
        .get_result::<TaskRow>(connection)
        .optional()
        .map_err(TaskRepositoryError::persistence)
}

/// `PostgreSQL`-backed board repository.
#[derive(Debug, Clone)]
pub struct PostgresBoardRepository {
    pool: BoardPgPool,
}

impl PostgresBoardRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: BoardPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> BoardRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> BoardRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(BoardRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(BoardRepositoryError::persistence)?
    }
}

#[async_trait]
impl BoardRepository for PostgresBoardRepository {
    async fn store(&self, board: &Board) -> BoardRepositoryResult<()> {
        let board_id = board.id();
        let new_row = NewBoardRow {
            id: board_id.into_inner(),
            name: board.name().as_str().to_owned(),
            created_at: board.created_at(),
        };

        self.run_blocking(move |connection| {
            diesel::insert_into(boards::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        BoardRepositoryError::DuplicateBoard(board_id)
                    }
                    other => BoardRepositoryError::persistence(other),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: BoardId) -> BoardRepositoryResult<Option<Board>> {
        self.run_blocking(move |connection| {
            let row = boards::table
                .filter(boards::id.eq(id.into_inner()))
                .select(BoardRow::as_select())
                .first::<BoardRow>(connection)
                .optional()
                .map_err(BoardRepositoryError::persistence)?;
            row.map(row_to_board).transpose()
        })
        .await
    }

    async fn list_all(&self) -> BoardRepositoryResult<Vec<Board>> {
        self.run_blocking(move |connection| {
            let rows = boards::table
                .order(boards::created_at.asc())
                .select(BoardRow::as_select())
                .load::<BoardRow>(connection)
                .map_err(BoardRepositoryError::persistence)?;
            rows.into_iter().map(row_to_board).collect()
        })
        .await
    }
}

fn row_to_board(row: BoardRow) -> BoardRepositoryResult<Board> {
    let name = BoardName::new(row.name).map_err(BoardRepositoryError::persistence)?;
    Ok(Board::from_persisted(
        BoardId::from_uuid(row.id),
        name,
        row.created_at,
    ))
}
