//! Shared fixtures for in-memory sync integration tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use boardsync::board::{
    adapters::memory::{InMemoryBoardRepository, InMemoryTaskRepository},
    domain::{BoardId, Task},
    ports::TaskRepository,
};
use boardsync::integration::{
    adapters::{
        azure_devops::{AzureDevOpsApi, AzureWorkItem, AzureWorkItemState, JsonPatchOperation},
        github::{
            GitHubContentType, GitHubFieldOption, GitHubFieldValue, GitHubProjectItem,
            GitHubProjectsApi,
        },
        memory::InMemoryIntegrationRepository,
    },
    ports::{ConnectorError, ConnectorResult, RemoteConnectors},
    services::{PushBackService, SyncService},
};
use mockable::DefaultClock;
use rstest::fixture;
use serde_json::Value;

/// Sync service over in-memory stores.
pub type TestSyncService = SyncService<
    InMemoryIntegrationRepository,
    InMemoryTaskRepository,
    InMemoryBoardRepository,
    DefaultClock,
>;

/// Push-back service over in-memory stores.
pub type TestPushBackService =
    PushBackService<InMemoryTaskRepository, InMemoryIntegrationRepository, DefaultClock>;

/// In-memory stores shared by the services a test builds.
pub struct Stores {
    pub integrations: Arc<InMemoryIntegrationRepository>,
    pub tasks: Arc<InMemoryTaskRepository>,
    pub boards: Arc<InMemoryBoardRepository>,
}

/// Provides empty stores for each test.
#[fixture]
pub fn stores() -> Stores {
    Stores {
        integrations: Arc::new(InMemoryIntegrationRepository::new()),
        tasks: Arc::new(InMemoryTaskRepository::new()),
        boards: Arc::new(InMemoryBoardRepository::new()),
    }
}

impl Stores {
    /// Builds a sync service using `connectors`.
    pub fn sync_service(&self, connectors: RemoteConnectors) -> TestSyncService {
        SyncService::new(
            Arc::clone(&self.integrations),
            Arc::clone(&self.tasks),
            Arc::clone(&self.boards),
            connectors,
            Arc::new(DefaultClock),
        )
    }

    /// Builds a push-back service using `connectors`.
    pub fn push_back_service(&self, connectors: RemoteConnectors) -> TestPushBackService {
        PushBackService::new(
            Arc::clone(&self.tasks),
            Arc::clone(&self.integrations),
            connectors,
            Arc::new(DefaultClock),
        )
    }

    /// Returns the tasks of a board keyed by remote item id.
    ///
    /// # Errors
    ///
    /// Returns an error when the lookup fails or a task has no remote link.
    pub async fn tasks_by_remote_id(
        &self,
        board_id: BoardId,
    ) -> Result<BTreeMap<String, Task>, eyre::Report> {
        let tasks = self.tasks.find_by_board(board_id).await?;
        tasks
            .into_iter()
            .map(|task| -> Result<(String, Task), eyre::Report> {
                let remote_id = task
                    .remote()
                    .ok_or_else(|| eyre::eyre!("task {} has no remote link", task.id()))?
                    .remote_item_id()
                    .to_owned();
                Ok((remote_id, task))
            })
            .collect()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Azure DevOps project held in memory behind the REST client trait.
#[derive(Clone, Default)]
pub struct FakeAzureProject {
    state: Arc<Mutex<FakeAzureState>>,
}

#[derive(Default)]
struct FakeAzureState {
    work_items: BTreeMap<u64, BTreeMap<String, Value>>,
    type_states: HashMap<String, Vec<AzureWorkItemState>>,
    queries: Vec<String>,
}

impl FakeAzureProject {
    /// Adds or replaces a work item.
    pub fn put_work_item(&self, id: u64, work_item_type: &str, title: &str, state: &str) {
        let fields = BTreeMap::from([
            ("System.WorkItemType".to_owned(), Value::from(work_item_type)),
            ("System.Title".to_owned(), Value::from(title)),
            ("System.State".to_owned(), Value::from(state)),
        ]);
        lock(&self.state).work_items.insert(id, fields);
    }

    /// Sets the states a work item type accepts.
    pub fn set_type_states(&self, work_item_type: &str, states: &[(&str, &str)]) {
        let listed = states
            .iter()
            .map(|(name, category)| AzureWorkItemState {
                name: (*name).to_owned(),
                category: Some((*category).to_owned()),
            })
            .collect();
        lock(&self.state)
            .type_states
            .insert(work_item_type.to_owned(), listed);
    }

    /// Returns a text field of a work item.
    pub fn field(&self, id: u64, field: &str) -> Option<String> {
        lock(&self.state)
            .work_items
            .get(&id)
            .and_then(|fields| fields.get(field))
            .and_then(Value::as_str)
            .map(str::to_owned)
    }

    /// Returns every WIQL query received.
    pub fn queries(&self) -> Vec<String> {
        lock(&self.state).queries.clone()
    }
}

#[async_trait]
impl AzureDevOpsApi for FakeAzureProject {
    async fn query_work_item_ids(&self, _project: &str, wiql: &str) -> ConnectorResult<Vec<u64>> {
        let mut state = lock(&self.state);
        state.queries.push(wiql.to_owned());
        let ids = state
            .work_items
            .iter()
            .filter(|(_, fields)| {
                fields
                    .get("System.WorkItemType")
                    .and_then(Value::as_str)
                    .is_some_and(|kind| {
                        !wiql.contains("[System.WorkItemType] IN")
                            || wiql.contains(&format!("'{kind}'"))
                    })
            })
            .map(|(id, _)| *id)
            .collect();
        Ok(ids)
    }

    async fn get_work_items(
        &self,
        _project: &str,
        ids: &[u64],
        fields: &[String],
    ) -> ConnectorResult<Vec<AzureWorkItem>> {
        let state = lock(&self.state);
        Ok(ids
            .iter()
            .filter_map(|id| {
                let stored = state.work_items.get(id)?;
                let projected = stored
                    .iter()
                    .filter(|(name, _)| fields.contains(*name))
                    .map(|(name, value)| (name.clone(), value.clone()))
                    .collect();
                Some(AzureWorkItem {
                    id: *id,
                    fields: projected,
                })
            })
            .collect())
    }

    async fn update_work_item(
        &self,
        _project: &str,
        id: u64,
        operations: &[JsonPatchOperation],
    ) -> ConnectorResult<()> {
        let mut state = lock(&self.state);
        let fields = state
            .work_items
            .get_mut(&id)
            .ok_or_else(|| ConnectorError::from_status(404, format!("work item {id}")))?;
        for operation in operations {
            let field = operation
                .path
                .strip_prefix("/fields/")
                .ok_or_else(|| ConnectorError::from_status(400, operation.path.clone()))?;
            fields.insert(field.to_owned(), operation.value.clone());
        }
        Ok(())
    }

    async fn list_work_item_type_states(
        &self,
        _project: &str,
        work_item_type: &str,
    ) -> ConnectorResult<Vec<AzureWorkItemState>> {
        Ok(lock(&self.state)
            .type_states
            .get(work_item_type)
            .cloned()
            .unwrap_or_default())
    }
}

/// GitHub project held in memory behind the projects client trait.
#[derive(Clone, Default)]
pub struct FakeGitHubProject {
    state: Arc<Mutex<FakeGitHubState>>,
}

#[derive(Default)]
struct FakeGitHubState {
    items: Vec<GitHubProjectItem>,
    options: Vec<GitHubFieldOption>,
}

impl FakeGitHubProject {
    /// Creates a project whose status field offers `option_names`.
    pub fn with_status_options(option_names: &[&str]) -> Self {
        let project = Self::default();
        lock(&project.state).options = option_names
            .iter()
            .enumerate()
            .map(|(index, name)| GitHubFieldOption {
                id: format!("opt_{index}"),
                name: (*name).to_owned(),
            })
            .collect();
        project
    }

    /// Adds an item with a status option selected on `field_id`.
    pub fn add_item(
        &self,
        id: &str,
        content_type: GitHubContentType,
        title: &str,
        field_id: &str,
        status: &str,
    ) {
        lock(&self.state).items.push(GitHubProjectItem {
            id: id.to_owned(),
            content_type: Some(content_type),
            title: title.to_owned(),
            body: None,
            field_values: vec![GitHubFieldValue {
                field_id: field_id.to_owned(),
                field_name: "Status".to_owned(),
                option_name: Some(status.to_owned()),
            }],
        });
    }

    /// Returns the selected status option name of an item.
    pub fn status_of(&self, id: &str) -> Option<String> {
        lock(&self.state)
            .items
            .iter()
            .find(|item| item.id == id)
            .and_then(|item| item.field_values.first())
            .and_then(|value| value.option_name.clone())
    }
}

#[async_trait]
impl GitHubProjectsApi for FakeGitHubProject {
    async fn list_project_items(
        &self,
        _project_id: &str,
    ) -> ConnectorResult<Vec<GitHubProjectItem>> {
        Ok(lock(&self.state).items.clone())
    }

    async fn list_single_select_options(
        &self,
        _project_id: &str,
        _field_id: &str,
    ) -> ConnectorResult<Vec<GitHubFieldOption>> {
        Ok(lock(&self.state).options.clone())
    }

    async fn set_single_select_value(
        &self,
        _project_id: &str,
        item_id: &str,
        field_id: &str,
        option_id: &str,
    ) -> ConnectorResult<()> {
        let mut state = lock(&self.state);
        let option_name = state
            .options
            .iter()
            .find(|option| option.id == option_id)
            .map(|option| option.name.clone())
            .ok_or_else(|| ConnectorError::from_status(422, format!("option {option_id}")))?;
        let value = state
            .items
            .iter_mut()
            .find(|item| item.id == item_id)
            .and_then(|item| {
                item.field_values
                    .iter_mut()
                    .find(|value| value.field_id == field_id)
            })
            .ok_or_else(|| ConnectorError::from_status(404, format!("item {item_id}")))?;
        value.option_name = Some(option_name);
        Ok(())
    }
}
