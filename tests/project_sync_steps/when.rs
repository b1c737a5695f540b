//! When steps for project sync BDD scenarios.

use super::world::{ProjectSyncWorld, run_async};
use boardsync::board::domain::TaskStatus;
use eyre::WrapErr;
use rstest_bdd_macros::when;

#[when(r#"the project is imported as board "{board_name}""#)]
fn import_project(world: &mut ProjectSyncWorld, board_name: String) -> Result<(), eyre::Report> {
    world.import_project(&board_name)
}

#[when("the project is synced again")]
fn sync_again(world: &mut ProjectSyncWorld) -> Result<(), eyre::Report> {
    let integration_id = world.integration()?.id();
    let result = run_async(world.sync_service().sync(integration_id));
    world.last_sync_result = Some(result);
    Ok(())
}

#[when(r#"the task for item "{item_id}" is moved to "{status}""#)]
fn move_task(
    world: &mut ProjectSyncWorld,
    item_id: String,
    status: String,
) -> Result<(), eyre::Report> {
    let target = TaskStatus::try_from(status.as_str()).wrap_err("parse target status")?;
    let task = world.task_for(&item_id)?;
    let result = run_async(
        world
            .push_back_service()
            .push_status_change(task.id(), target),
    );
    world.last_push_result = Some(result);
    Ok(())
}
