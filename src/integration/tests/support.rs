//! Shared fixtures for integration service tests.

use crate::board::{
    adapters::memory::{InMemoryBoardRepository, InMemoryTaskRepository},
    domain::{Board, BoardName, Task, TaskStatus},
    ports::{BoardRepository, TaskRepository},
};
use crate::integration::{
    adapters::memory::{InMemoryIntegrationRepository, InMemoryRemoteConnector},
    domain::{FieldMapping, Integration, LocalField, NewIntegration, RemoteSystem},
    ports::{IntegrationRepository, RemoteConnectors},
    services::{PushBackService, SyncService, SyncStatusBoard},
};
use mockable::DefaultClock;
use rstest::fixture;
use std::sync::Arc;

pub(super) const PROJECT_ID: &str = "PVT_1";
pub(super) const STATUS_FIELD: &str = "PVTSSF_status";

pub(super) type TestSyncService = SyncService<
    InMemoryIntegrationRepository,
    InMemoryTaskRepository,
    InMemoryBoardRepository,
    DefaultClock,
>;

pub(super) type TestPushBackService =
    PushBackService<InMemoryTaskRepository, InMemoryIntegrationRepository, DefaultClock>;

/// In-memory stores plus one GitHub connector, shared by every service the
/// harness builds.
pub(super) struct Harness {
    pub integrations: Arc<InMemoryIntegrationRepository>,
    pub tasks: Arc<InMemoryTaskRepository>,
    pub boards: Arc<InMemoryBoardRepository>,
    pub remote: InMemoryRemoteConnector,
    pub status: Arc<SyncStatusBoard>,
}

#[fixture]
pub(super) fn harness() -> Harness {
    Harness {
        integrations: Arc::new(InMemoryIntegrationRepository::new()),
        tasks: Arc::new(InMemoryTaskRepository::new()),
        boards: Arc::new(InMemoryBoardRepository::new()),
        remote: InMemoryRemoteConnector::new(RemoteSystem::GitHub),
        status: Arc::new(SyncStatusBoard::new()),
    }
}

/// `Todo`, `In Progress`, and `Done` mapped both ways.
pub(super) fn github_status_mapping() -> FieldMapping {
    FieldMapping::new(STATUS_FIELD, "Status", LocalField::Status)
        .with_pair("Todo", TaskStatus::Todo)
        .with_pair("In Progress", TaskStatus::InProcess)
        .with_pair("Done", TaskStatus::Complete)
}

impl Harness {
    pub(super) fn connectors(&self) -> RemoteConnectors {
        RemoteConnectors::new().with(Arc::new(self.remote.clone()))
    }

    pub(super) fn sync_service(&self) -> TestSyncService {
        SyncService::new(
            Arc::clone(&self.integrations),
            Arc::clone(&self.tasks),
            Arc::clone(&self.boards),
            self.connectors(),
            Arc::new(DefaultClock),
        )
        .with_status_board(Arc::clone(&self.status))
    }

    pub(super) fn push_back_service(&self) -> TestPushBackService {
        PushBackService::new(
            Arc::clone(&self.tasks),
            Arc::clone(&self.integrations),
            self.connectors(),
            Arc::new(DefaultClock),
        )
    }

    /// Stores a board and a GitHub integration for [`PROJECT_ID`].
    pub(super) async fn register(
        &self,
        field_mappings: Vec<FieldMapping>,
        type_filter: Vec<String>,
    ) -> Integration {
        let board = Board::new(
            BoardName::new("Roadmap").expect("valid board name"),
            &DefaultClock,
        );
        self.boards.store(&board).await.expect("store board");
        let integration = Integration::new(
            NewIntegration {
                remote_system: RemoteSystem::GitHub,
                remote_project_id: PROJECT_ID.to_owned(),
                remote_project_name: "Roadmap".to_owned(),
                local_board_id: board.id(),
                field_mappings,
                type_filter,
                status_field_id: Some(STATUS_FIELD.to_owned()),
            },
            &DefaultClock,
        )
        .expect("valid integration");
        self.integrations
            .store(&integration)
            .await
            .expect("store integration");
        integration
    }

    /// Returns the task mirroring a remote item, failing the test when absent.
    pub(super) async fn linked_task(&self, integration: &Integration, item_id: &str) -> Task {
        self.tasks
            .find_by_remote_item(integration.id(), item_id)
            .await
            .expect("lookup should succeed")
            .expect("task should be linked")
    }
}
