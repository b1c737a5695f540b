//! Given steps for project sync BDD scenarios.

use super::world::ProjectSyncWorld;
use boardsync::board::domain::TaskStatus;
use boardsync::integration::{
    domain::{FieldMapping, LocalField, RemoteItem},
    ports::ConnectorError,
};
use eyre::WrapErr;
use rstest_bdd_macros::given;

const STATUS_FIELD: &str = "PVTSSF_status";

#[given(
    r#"a GitHub project "{project_id}" with item "{item_id}" titled "{title}" in status "{status}""#
)]
fn github_project_with_item(
    world: &mut ProjectSyncWorld,
    project_id: String,
    item_id: String,
    title: String,
    status: String,
) -> Result<(), eyre::Report> {
    world.project_id = Some(project_id);
    world
        .remote_items
        .push(RemoteItem::new(item_id, title).with_status(status));
    world.publish_remote_items()
}

#[given(r#"the project maps "{todo}", "{in_progress}", and "{done}" to board columns"#)]
fn project_maps_three_values(
    world: &mut ProjectSyncWorld,
    todo: String,
    in_progress: String,
    done: String,
) {
    world.mapping = Some(
        FieldMapping::new(STATUS_FIELD, "Status", LocalField::Status)
            .with_pair(todo, TaskStatus::Todo)
            .with_pair(in_progress, TaskStatus::InProcess)
            .with_pair(done, TaskStatus::Complete),
    );
}

#[given(r#"the project maps only "{todo}" and "{in_progress}" to board columns"#)]
fn project_maps_two_values(world: &mut ProjectSyncWorld, todo: String, in_progress: String) {
    world.mapping = Some(
        FieldMapping::new(STATUS_FIELD, "Status", LocalField::Status)
            .with_pair(todo, TaskStatus::Todo)
            .with_pair(in_progress, TaskStatus::InProcess),
    );
}

#[given(r#"the project has been imported as board "{board_name}""#)]
fn project_already_imported(
    world: &mut ProjectSyncWorld,
    board_name: String,
) -> Result<(), eyre::Report> {
    world.import_project(&board_name)
}

#[given(r#"remote item "{item_id}" moves to status "{status}""#)]
fn remote_item_changes_status(
    world: &mut ProjectSyncWorld,
    item_id: String,
    status: String,
) -> Result<(), eyre::Report> {
    let item = world
        .remote_items
        .iter_mut()
        .find(|item| item.id == item_id)
        .ok_or_else(|| eyre::eyre!("remote item {item_id} is not part of the scenario"))?;
    item.status_value = Some(status);
    world.publish_remote_items()
}

#[given("the remote rejects the credentials")]
fn remote_rejects_credentials(world: &mut ProjectSyncWorld) -> Result<(), eyre::Report> {
    world
        .remote
        .fail_fetches_with(ConnectorError::Unauthorized("bad credentials".to_owned()))
        .wrap_err("inject fetch failure")
}
