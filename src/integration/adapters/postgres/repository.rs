//! `PostgreSQL` repository implementation for integrations.

use super::{
    models::{IntegrationChangeset, IntegrationRow, NewIntegrationRow},
    schema::integrations,
};
use crate::board::domain::BoardId;
use crate::integration::{
    domain::{FieldMapping, Integration, IntegrationId, PersistedIntegrationData, RemoteSystem},
    ports::{IntegrationRepository, IntegrationRepositoryError, IntegrationRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by integration adapters.
pub type IntegrationPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed integration repository.
#[derive(Debug, Clone)]
pub struct PostgresIntegrationRepository {
    pool: IntegrationPgPool,
}

impl PostgresIntegrationRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: IntegrationPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> IntegrationRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> IntegrationRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(IntegrationRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(IntegrationRepositoryError::persistence)?
    }
}

#[async_trait]
impl IntegrationRepository for PostgresIntegrationRepository {
    async fn store(&self, integration: &Integration) -> IntegrationRepositoryResult<()> {
        let integration_id = integration.id();
        let board_id = integration.local_board_id();
        let new_row = to_new_row(integration)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(integrations::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if is_board_unique_violation(info.as_ref()) =>
                    {
                        IntegrationRepositoryError::DuplicateBoardIntegration(board_id)
                    }
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        IntegrationRepositoryError::DuplicateIntegration(integration_id)
                    }
                    other => IntegrationRepositoryError::persistence(other),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, integration: &Integration) -> IntegrationRepositoryResult<()> {
        let integration_id = integration.id();
        let changeset = to_changeset(integration)?;

        self.run_blocking(move |connection| {
            let affected = diesel::update(
                integrations::table.filter(integrations::id.eq(integration_id.into_inner())),
            )
            .set(&changeset)
            .execute(connection)
            .map_err(IntegrationRepositoryError::persistence)?;
            if affected == 0 {
                return Err(IntegrationRepositoryError::NotFound(integration_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(
        &self,
        id: IntegrationId,
    ) -> IntegrationRepositoryResult<Option<Integration>> {
        self.run_blocking(move |connection| {
            let row = integrations::table
                .filter(integrations::id.eq(id.into_inner()))
                .select(IntegrationRow::as_select())
                .first::<IntegrationRow>(connection)
                .optional()
                .map_err(IntegrationRepositoryError::persistence)?;
            row.map(row_to_integration).transpose()
        })
        .await
    }

    async fn find_by_board(
        &self,
        board_id: BoardId,
    ) -> IntegrationRepositoryResult<Option<Integration>> {
        self.run_blocking(move |connection| {
            let row = integrations::table
                .filter(integrations::local_board_id.eq(board_id.into_inner()))
                .select(IntegrationRow::as_select())
                .first::<IntegrationRow>(connection)
                .optional()
                .map_err(IntegrationRepositoryError::persistence)?;
            row.map(row_to_integration).transpose()
        })
        .await
    }

    async fn list_all(&self) -> IntegrationRepositoryResult<Vec<Integration>> {
        self.run_blocking(move |connection| {
            let rows = integrations::table
                .order(integrations::created_at.asc())
                .select(IntegrationRow::as_select())
                .load::<IntegrationRow>(connection)
                .map_err(IntegrationRepositoryError::persistence)?;
            rows.into_iter().map(row_to_integration).collect()
        })
        .await
    }

    async fn delete(&self, id: IntegrationId) -> IntegrationRepositoryResult<bool> {
        self.run_blocking(move |connection| {
            let affected =
                diesel::delete(integrations::table.filter(integrations::id.eq(id.into_inner())))
                    .execute(connection)
                    .map_err(IntegrationRepositoryError::persistence)?;
            Ok(affected > 0)
        })
        .await
    }
}

fn to_new_row(integration: &Integration) -> IntegrationRepositoryResult<NewIntegrationRow> {
    Ok(NewIntegrationRow {
        id: integration.id().into_inner(),
        remote_system: integration.remote_system().as_str().to_owned(),
        remote_project_id: integration.remote_project_id().to_owned(),
        remote_project_name: integration.remote_project_name().to_owned(),
        local_board_id: integration.local_board_id().into_inner(),
        field_mappings: serde_json::to_value(integration.field_mappings())
            .map_err(IntegrationRepositoryError::persistence)?,
        type_filter: serde_json::to_value(integration.type_filter())
            .map_err(IntegrationRepositoryError::persistence)?,
        status_field_id: integration.status_field_id().map(str::to_owned),
        last_sync_at: integration.last_sync_at(),
        created_at: integration.created_at(),
        updated_at: integration.updated_at(),
    })
}

fn to_changeset(integration: &Integration) -> IntegrationRepositoryResult<IntegrationChangeset> {
    Ok(IntegrationChangeset {
        remote_project_name: integration.remote_project_name().to_owned(),
        field_mappings: serde_json::to_value(integration.field_mappings())
            .map_err(IntegrationRepositoryError::persistence)?,
        type_filter: serde_json::to_value(integration.type_filter())
            .map_err(IntegrationRepositoryError::persistence)?,
        status_field_id: integration.status_field_id().map(str::to_owned),
        last_sync_at: integration.last_sync_at(),
        updated_at: integration.updated_at(),
    })
}

fn row_to_integration(row: IntegrationRow) -> IntegrationRepositoryResult<Integration> {
    let IntegrationRow {
        id,
        remote_system: persisted_system,
        remote_project_id,
        remote_project_name,
        local_board_id,
        field_mappings: persisted_mappings,
        type_filter: persisted_filter,
        status_field_id,
        last_sync_at,
        created_at,
        updated_at,
    } = row;

    let remote_system = RemoteSystem::try_from(persisted_system.as_str())
        .map_err(IntegrationRepositoryError::persistence)?;
    let field_mappings = serde_json::from_value::<Vec<FieldMapping>>(persisted_mappings)
        .map_err(IntegrationRepositoryError::persistence)?;
    let type_filter = serde_json::from_value::<Vec<String>>(persisted_filter)
        .map_err(IntegrationRepositoryError::persistence)?;

    Ok(Integration::from_persisted(PersistedIntegrationData {
        id: IntegrationId::from_uuid(id),
        remote_system,
        remote_project_id,
        remote_project_name,
        local_board_id: BoardId::from_uuid(local_board_id),
        field_mappings,
        type_filter,
        status_field_id,
        last_sync_at,
        created_at,
        updated_at,
    }))
}

fn is_board_unique_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| name == "idx_integrations_local_board_unique")
}
