//! Shared world state for project sync BDD scenarios.

use std::sync::Arc;

use boardsync::board::{
    adapters::memory::{InMemoryBoardRepository, InMemoryTaskRepository},
    domain::Task,
    ports::TaskRepository,
};
use boardsync::integration::{
    adapters::memory::{InMemoryIntegrationRepository, InMemoryRemoteConnector},
    domain::{FieldMapping, Integration, RemoteItem, RemoteSystem, SyncResult},
    ports::RemoteConnectors,
    services::{
        ImportProjectRequest, PushBackError, PushBackService, SyncError, SyncService,
        SyncStatusBoard,
    },
};
use eyre::WrapErr;
use mockable::DefaultClock;
use rstest::fixture;

/// Sync service type used by the BDD world.
pub type TestSyncService = SyncService<
    InMemoryIntegrationRepository,
    InMemoryTaskRepository,
    InMemoryBoardRepository,
    DefaultClock,
>;

/// Push-back service type used by the BDD world.
pub type TestPushBackService =
    PushBackService<InMemoryTaskRepository, InMemoryIntegrationRepository, DefaultClock>;

/// Scenario world for project sync behaviour tests.
pub struct ProjectSyncWorld {
    pub integrations: Arc<InMemoryIntegrationRepository>,
    pub tasks: Arc<InMemoryTaskRepository>,
    pub boards: Arc<InMemoryBoardRepository>,
    pub remote: InMemoryRemoteConnector,
    pub status: Arc<SyncStatusBoard>,
    pub project_id: Option<String>,
    pub remote_items: Vec<RemoteItem>,
    pub mapping: Option<FieldMapping>,
    pub integration: Option<Integration>,
    pub last_sync_result: Option<Result<SyncResult, SyncError>>,
    pub last_push_result: Option<Result<Task, PushBackError>>,
}

impl ProjectSyncWorld {
    /// Creates a world with empty stores and a GitHub connector.
    #[must_use]
    pub fn new() -> Self {
        Self {
            integrations: Arc::new(InMemoryIntegrationRepository::new()),
            tasks: Arc::new(InMemoryTaskRepository::new()),
            boards: Arc::new(InMemoryBoardRepository::new()),
            remote: InMemoryRemoteConnector::new(RemoteSystem::GitHub),
            status: Arc::new(SyncStatusBoard::new()),
            project_id: None,
            remote_items: Vec::new(),
            mapping: None,
            integration: None,
            last_sync_result: None,
            last_push_result: None,
        }
    }

    fn connectors(&self) -> RemoteConnectors {
        RemoteConnectors::new().with(Arc::new(self.remote.clone()))
    }

    /// Builds a sync service over the world's stores.
    pub fn sync_service(&self) -> TestSyncService {
        SyncService::new(
            Arc::clone(&self.integrations),
            Arc::clone(&self.tasks),
            Arc::clone(&self.boards),
            self.connectors(),
            Arc::new(DefaultClock),
        )
        .with_status_board(Arc::clone(&self.status))
    }

    /// Builds a push-back service over the world's stores.
    pub fn push_back_service(&self) -> TestPushBackService {
        PushBackService::new(
            Arc::clone(&self.tasks),
            Arc::clone(&self.integrations),
            self.connectors(),
            Arc::new(DefaultClock),
        )
    }

    /// Returns the imported integration.
    ///
    /// # Errors
    ///
    /// Returns an error when no project was imported.
    pub fn integration(&self) -> Result<&Integration, eyre::Report> {
        self.integration
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing imported integration in scenario world"))
    }

    /// Returns the project identifier of the scenario.
    ///
    /// # Errors
    ///
    /// Returns an error when no project was described.
    pub fn project_id(&self) -> Result<&str, eyre::Report> {
        self.project_id
            .as_deref()
            .ok_or_else(|| eyre::eyre!("missing remote project in scenario world"))
    }

    /// Publishes the scenario's remote items to the connector.
    ///
    /// # Errors
    ///
    /// Returns an error when no project was described or seeding fails.
    pub fn publish_remote_items(&self) -> Result<(), eyre::Report> {
        let project_id = self.project_id()?.to_owned();
        self.remote
            .set_items(project_id, self.remote_items.clone())
            .wrap_err("seed remote items")
    }

    /// Imports the scenario's project into a new board.
    ///
    /// # Errors
    ///
    /// Returns an error when no project was described or the import fails.
    pub fn import_project(&mut self, board_name: &str) -> Result<(), eyre::Report> {
        let mut request =
            ImportProjectRequest::new(RemoteSystem::GitHub, self.project_id()?, board_name);
        if let Some(mapping) = self.mapping.clone() {
            request = request
                .with_status_field(mapping.remote_field_id())
                .with_field_mapping(mapping);
        }
        let imported = run_async(self.sync_service().import_project(request))
            .wrap_err("import remote project")?;
        self.integration = Some(imported.integration);
        self.last_sync_result = Some(Ok(imported.initial_sync));
        Ok(())
    }

    /// Finds the task mirroring a remote item of the imported integration.
    ///
    /// # Errors
    ///
    /// Returns an error when nothing was imported, the lookup fails, or no
    /// task mirrors the item.
    pub fn task_for(&self, item_id: &str) -> Result<Task, eyre::Report> {
        let integration_id = self.integration()?.id();
        run_async(self.tasks.find_by_remote_item(integration_id, item_id))?
            .ok_or_else(|| eyre::eyre!("no task mirrors remote item {item_id}"))
    }
}

impl Default for ProjectSyncWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> ProjectSyncWorld {
    ProjectSyncWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
