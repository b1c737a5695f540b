//! End-to-end flows over the in-memory connector.

use std::sync::Arc;

use boardsync::board::domain::{Task, TaskStatus};
use boardsync::integration::{
    adapters::memory::InMemoryRemoteConnector,
    domain::{FieldMapping, LocalField, RemoteItem, RemoteStatusOption, RemoteSystem},
    ports::RemoteConnectors,
    services::{
        ImportProjectRequest, IntegrationRegistryService, SyncStatusBoard, SyncStatusUpdate,
    },
};
use mockable::DefaultClock;
use rstest::rstest;

use super::helpers::{Stores, stores};

const PROJECT: &str = "PVT_kwDOA";
const FIELD: &str = "PVTSSF_status";

fn remote_with_items(items: Vec<RemoteItem>) -> InMemoryRemoteConnector {
    let remote = InMemoryRemoteConnector::new(RemoteSystem::GitHub);
    remote.set_items(PROJECT, items).expect("seed items");
    remote
}

fn status_mapping() -> FieldMapping {
    FieldMapping::new(FIELD, "Status", LocalField::Status)
        .with_pair("Todo", TaskStatus::Todo)
        .with_pair("In Progress", TaskStatus::InProcess)
        .with_pair("Done", TaskStatus::Complete)
}

fn import_request() -> ImportProjectRequest {
    ImportProjectRequest::new(RemoteSystem::GitHub, PROJECT, "Platform roadmap")
        .with_field_mapping(status_mapping())
        .with_status_field(FIELD)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn import_sync_and_push_back_round_trip(stores: Stores) -> Result<(), eyre::Report> {
    let remote = remote_with_items(vec![
        RemoteItem::new("42", "Fix bug").with_status("In Progress"),
        RemoteItem::new("43", "Plan release").with_status("Todo"),
    ]);
    let connectors = RemoteConnectors::new().with(Arc::new(remote.clone()));
    let sync = stores.sync_service(connectors.clone());
    let push_back = stores.push_back_service(connectors);

    let imported = sync.import_project(import_request()).await?;
    eyre::ensure!(imported.initial_sync.created == 2, "expected two tasks");
    let board_id = imported.board.id();
    let tasks = stores.tasks_by_remote_id(board_id).await?;
    let fix_bug = tasks
        .get("42")
        .ok_or_else(|| eyre::eyre!("task for item 42 missing"))?;
    eyre::ensure!(fix_bug.status() == TaskStatus::InProcess, "wrong status");

    push_back
        .push_status_change(fix_bug.id(), TaskStatus::Complete)
        .await?;
    let updates = remote.recorded_updates()?;
    eyre::ensure!(updates.len() == 1, "expected one remote write");

    let resync = sync.sync(imported.integration.id()).await?;
    eyre::ensure!(
        resync.unchanged == 2 && resync.updated == 0 && resync.created == 0,
        "expected a quiet re-sync, got {resync:?}"
    );
    let after = stores.tasks_by_remote_id(board_id).await?;
    let pushed = after
        .get("42")
        .ok_or_else(|| eyre::eyre!("task for item 42 missing"))?;
    eyre::ensure!(pushed.status() == TaskStatus::Complete, "push-back lost");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn status_subscribers_follow_a_run(stores: Stores) -> Result<(), eyre::Report> {
    let remote = remote_with_items(vec![RemoteItem::new("1", "Only item")]);
    let status = Arc::new(SyncStatusBoard::new());
    let sync = stores
        .sync_service(RemoteConnectors::new().with(Arc::new(remote)))
        .with_status_board(Arc::clone(&status));
    let imported = sync.import_project(import_request()).await?;
    let mut updates = status.subscribe();

    let result = sync.sync(imported.integration.id()).await?;

    let started: SyncStatusUpdate = updates.recv().await?;
    let finished: SyncStatusUpdate = updates.recv().await?;
    eyre::ensure!(started.status.in_progress, "start not published");
    eyre::ensure!(!finished.status.in_progress, "finish not published");
    eyre::ensure!(
        finished.status.last_result == Some(result),
        "finish carries the run result"
    );
    eyre::ensure!(
        status.snapshot(imported.integration.id()).error.is_none(),
        "no error expected"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_an_integration_keeps_its_tasks(stores: Stores) -> Result<(), eyre::Report> {
    let remote = remote_with_items(vec![RemoteItem::new("7", "Keep me")]);
    let sync = stores.sync_service(RemoteConnectors::new().with(Arc::new(remote)));
    let registry = IntegrationRegistryService::new(
        Arc::clone(&stores.integrations),
        Arc::new(DefaultClock),
    );
    let imported = sync.import_project(import_request()).await?;

    let listed = registry.list_all().await?;
    eyre::ensure!(listed.len() == 1, "imported integration is listed");
    registry.delete(imported.integration.id()).await?;

    eyre::ensure!(
        registry.find_by_board(imported.board.id()).await?.is_none(),
        "integration removed"
    );
    let tasks = stores.tasks_by_remote_id(imported.board.id()).await?;
    eyre::ensure!(tasks.contains_key("7"), "task survives deletion");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn suggested_mapping_drives_an_import(stores: Stores) -> Result<(), eyre::Report> {
    let remote = remote_with_items(vec![
        RemoteItem::new("1", "Shipped feature").with_status("Shipped"),
        RemoteItem::new("2", "Under review").with_status("In review"),
        RemoteItem::new("3", "Dropped").with_status("Won't fix"),
    ]);
    remote.set_status_options(
        PROJECT,
        ["Backlog", "In review", "Shipped", "Won't fix"]
            .into_iter()
            .map(RemoteStatusOption::new)
            .collect(),
    )?;
    let sync = stores.sync_service(RemoteConnectors::new().with(Arc::new(remote)));

    let mapping = sync
        .suggest_mapping(RemoteSystem::GitHub, PROJECT, FIELD, "Status", &[])
        .await?;
    let imported = sync
        .import_project(
            ImportProjectRequest::new(RemoteSystem::GitHub, PROJECT, "Launch")
                .with_field_mapping(mapping),
        )
        .await?;

    let tasks = stores.tasks_by_remote_id(imported.board.id()).await?;
    let statuses: Vec<TaskStatus> = ["1", "2", "3"]
        .iter()
        .filter_map(|id| tasks.get(*id).map(Task::status))
        .collect();
    eyre::ensure!(
        statuses == [TaskStatus::Complete, TaskStatus::InProcess, TaskStatus::Backlog],
        "unexpected statuses {statuses:?}"
    );
    Ok(())
}
