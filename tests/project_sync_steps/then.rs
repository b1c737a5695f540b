//! Then steps for project sync BDD scenarios.

use super::world::ProjectSyncWorld;
use boardsync::board::domain::TaskStatus;
use boardsync::integration::{
    domain::SyncResult,
    ports::ConnectorError,
    services::{PushBackError, SyncError},
};
use eyre::WrapErr;
use rstest_bdd_macros::then;

fn last_sync(world: &ProjectSyncWorld) -> Result<&SyncResult, eyre::Report> {
    world
        .last_sync_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing sync result in scenario world"))?
        .as_ref()
        .map_err(|err| eyre::eyre!("unexpected sync failure: {err}"))
}

#[then(r#"the board has a task for item "{item_id}" titled "{title}" in status "{status}""#)]
fn board_has_task(
    world: &ProjectSyncWorld,
    item_id: String,
    title: String,
    status: String,
) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str()).wrap_err("parse expected status")?;
    let task = world.task_for(&item_id)?;
    let board_id = world.integration()?.local_board_id();

    eyre::ensure!(task.board_id() == board_id, "task is on another board");
    eyre::ensure!(
        task.title() == title,
        "expected title {title}, found {}",
        task.title()
    );
    eyre::ensure!(
        task.status() == expected,
        "expected status {expected}, found {}",
        task.status()
    );
    Ok(())
}

#[then("the last sync created {count:usize} task")]
fn last_sync_created(world: &ProjectSyncWorld, count: usize) -> Result<(), eyre::Report> {
    let result = last_sync(world)?;
    eyre::ensure!(result.created == count, "unexpected result {result:?}");
    eyre::ensure!(result.is_clean(), "unexpected item errors {:?}", result.errors);
    Ok(())
}

#[then("the last sync left {count:usize} task unchanged")]
fn last_sync_unchanged(world: &ProjectSyncWorld, count: usize) -> Result<(), eyre::Report> {
    let result = last_sync(world)?;
    eyre::ensure!(
        result.unchanged == count && result.created == 0 && result.updated == 0,
        "unexpected result {result:?}"
    );
    Ok(())
}

#[then("the last sync updated {count:usize} task")]
fn last_sync_updated(world: &ProjectSyncWorld, count: usize) -> Result<(), eyre::Report> {
    let result = last_sync(world)?;
    eyre::ensure!(result.updated == count, "unexpected result {result:?}");
    Ok(())
}

#[then(r#"remote item "{item_id}" was set to "{value}""#)]
fn remote_item_was_set(
    world: &ProjectSyncWorld,
    item_id: String,
    value: String,
) -> Result<(), eyre::Report> {
    let updates = world
        .remote
        .recorded_updates()
        .wrap_err("read recorded updates")?;
    eyre::ensure!(
        updates
            .iter()
            .any(|update| update.remote_item_id == item_id && update.value == value),
        "no write of {value} to item {item_id} in {updates:?}"
    );
    Ok(())
}

#[then("the push-back is rejected because the status is unmapped")]
fn push_back_rejected(world: &ProjectSyncWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_push_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing push-back result in scenario world"))?;
    match result {
        Err(PushBackError::UnmappedStatus { .. }) => Ok(()),
        other => Err(eyre::eyre!("expected unmapped status error, got {other:?}")),
    }
}

#[then("no remote update was sent")]
fn no_remote_update(world: &ProjectSyncWorld) -> Result<(), eyre::Report> {
    let updates = world
        .remote
        .recorded_updates()
        .wrap_err("read recorded updates")?;
    eyre::ensure!(updates.is_empty(), "unexpected remote writes {updates:?}");
    Ok(())
}

#[then("the sync fails with a connector error")]
fn sync_fails(world: &ProjectSyncWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_sync_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing sync result in scenario world"))?;
    match result {
        Err(SyncError::Connector(ConnectorError::Unauthorized(_))) => Ok(()),
        other => Err(eyre::eyre!("expected connector failure, got {other:?}")),
    }
}

#[then("the sync status shows the failure")]
fn sync_status_shows_failure(world: &ProjectSyncWorld) -> Result<(), eyre::Report> {
    let status = world.status.snapshot(world.integration()?.id());
    eyre::ensure!(!status.in_progress, "latch still held");
    eyre::ensure!(status.error.is_some(), "no error published");
    eyre::ensure!(
        status.last_sync_at.is_some(),
        "previous successful sync time is kept"
    );
    Ok(())
}
