//! Azure DevOps work item connector.

use crate::integration::{
    domain::{Integration, RemoteItem, RemoteStatusOption, RemoteSystem},
    ports::{ConnectorError, ConnectorResult, RemoteConnector},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};

/// Maximum number of ids the work item batch endpoint accepts.
pub const WORK_ITEM_BATCH_SIZE: usize = 200;

/// Work item type whose states are listed when no type filter is set.
const DEFAULT_WORK_ITEM_TYPE: &str = "Task";

const FIELD_TITLE: &str = "System.Title";
const FIELD_DESCRIPTION: &str = "System.Description";
const FIELD_STATE: &str = "System.State";
const FIELD_WORK_ITEM_TYPE: &str = "System.WorkItemType";

/// Work item as returned by the batch endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AzureWorkItem {
    /// Numeric work item id.
    pub id: u64,
    /// Requested field values keyed by reference name.
    pub fields: BTreeMap<String, Value>,
}

impl AzureWorkItem {
    fn text_field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .and_then(Value::as_str)
            .filter(|text| !text.trim().is_empty())
    }
}

/// One state of a work item type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AzureWorkItemState {
    /// State name written to `System.State`.
    pub name: String,
    /// State category (`Proposed`, `InProgress`, `Resolved`, `Completed`,
    /// `Removed`).
    pub category: Option<String>,
}

/// JSON patch operation sent to the work item update endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonPatchOperation {
    /// Patch verb.
    pub op: String,
    /// Target path, `/fields/<reference name>`.
    pub path: String,
    /// New value.
    pub value: Value,
}

impl JsonPatchOperation {
    /// Builds an `add` operation setting one field.
    #[must_use]
    pub fn set_field(field_id: &str, value: impl Into<String>) -> Self {
        Self {
            op: "add".to_owned(),
            path: format!("/fields/{field_id}"),
            value: Value::String(value.into()),
        }
    }
}

/// Raw Azure DevOps REST client consumed by [`AzureDevOpsConnector`].
#[async_trait]
pub trait AzureDevOpsApi: Send + Sync {
    /// Runs a WIQL query and returns the matching work item ids.
    async fn query_work_item_ids(&self, project: &str, wiql: &str) -> ConnectorResult<Vec<u64>>;

    /// Fetches up to [`WORK_ITEM_BATCH_SIZE`] work items.
    async fn get_work_items(
        &self,
        project: &str,
        ids: &[u64],
        fields: &[String],
    ) -> ConnectorResult<Vec<AzureWorkItem>>;

    /// Applies a JSON patch document to one work item.
    async fn update_work_item(
        &self,
        project: &str,
        id: u64,
        operations: &[JsonPatchOperation],
    ) -> ConnectorResult<()>;

    /// Lists the states of a work item type.
    async fn list_work_item_type_states(
        &self,
        project: &str,
        work_item_type: &str,
    ) -> ConnectorResult<Vec<AzureWorkItemState>>;
}

/// [`RemoteConnector`] for Azure DevOps work items.
#[derive(Debug, Clone)]
pub struct AzureDevOpsConnector<A>
where
    A: AzureDevOpsApi,
{
    api: A,
}

impl<A> AzureDevOpsConnector<A>
where
    A: AzureDevOpsApi,
{
    /// Creates a connector over an API client.
    #[must_use]
    pub const fn new(api: A) -> Self {
        Self { api }
    }
}

#[async_trait]
impl<A> RemoteConnector for AzureDevOpsConnector<A>
where
    A: AzureDevOpsApi,
{
    fn system(&self) -> RemoteSystem {
        RemoteSystem::AzureDevOps
    }

    async fn fetch_items(&self, integration: &Integration) -> ConnectorResult<Vec<RemoteItem>> {
        let project = integration.remote_project_id();
        let query = build_wiql(project, integration.type_filter());
        let ids = self.api.query_work_item_ids(project, &query).await?;

        let status_field = integration.push_back_field_id().unwrap_or(FIELD_STATE);
        let fields = requested_fields(status_field);
        let mut items = Vec::with_capacity(ids.len());
        for batch in ids.chunks(WORK_ITEM_BATCH_SIZE) {
            let work_items = self.api.get_work_items(project, batch, &fields).await?;
            items.extend(
                work_items
                    .iter()
                    .map(|work_item| to_remote_item(work_item, status_field)),
            );
        }
        Ok(items)
    }

    async fn update_field(
        &self,
        remote_project_id: &str,
        remote_item_id: &str,
        field_id: &str,
        value: &str,
    ) -> ConnectorResult<()> {
        let id = remote_item_id.trim().parse::<u64>().map_err(|_| {
            ConnectorError::InvalidRequest(format!(
                "work item id '{remote_item_id}' is not numeric"
            ))
        })?;
        let operations = [JsonPatchOperation::set_field(field_id, value)];
        self.api
            .update_work_item(remote_project_id, id, &operations)
            .await
    }

    async fn list_status_options(
        &self,
        remote_project_id: &str,
        _field_id: &str,
        item_types: &[String],
    ) -> ConnectorResult<Vec<RemoteStatusOption>> {
        let default_types = [DEFAULT_WORK_ITEM_TYPE.to_owned()];
        let types = if item_types.is_empty() {
            default_types.as_slice()
        } else {
            item_types
        };

        let mut seen = HashSet::new();
        let mut options = Vec::new();
        for work_item_type in types {
            let states = self
                .api
                .list_work_item_type_states(remote_project_id, work_item_type)
                .await?;
            for state in states {
                if !seen.insert(state.name.to_ascii_lowercase()) {
                    continue;
                }
                let mut option = RemoteStatusOption::new(state.name);
                if let Some(category) = state.category {
                    option = option.with_category(category);
                }
                options.push(option);
            }
        }
        Ok(options)
    }
}

/// Builds the WIQL query selecting the project's work items.
#[must_use]
pub fn build_wiql(project: &str, work_item_types: &[String]) -> String {
    let mut query = format!(
        "SELECT [System.Id] FROM WorkItems WHERE [System.TeamProject] = {}",
        quote_wiql(project)
    );
    if !work_item_types.is_empty() {
        let types: Vec<String> = work_item_types
            .iter()
            .map(|kind| quote_wiql(kind))
            .collect();
        query.push_str(" AND [System.WorkItemType] IN (");
        query.push_str(&types.join(", "));
        query.push(')');
    }
    query.push_str(" ORDER BY [System.Id]");
    query
}

fn quote_wiql(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn requested_fields(status_field: &str) -> Vec<String> {
    let mut fields: Vec<String> = [
        FIELD_TITLE,
        FIELD_DESCRIPTION,
        FIELD_STATE,
        FIELD_WORK_ITEM_TYPE,
    ]
    .into_iter()
    .map(str::to_owned)
    .collect();
    if !fields.iter().any(|field| field == status_field) {
        fields.push(status_field.to_owned());
    }
    fields
}

fn to_remote_item(work_item: &AzureWorkItem, status_field: &str) -> RemoteItem {
    let mut item = RemoteItem::new(
        work_item.id.to_string(),
        work_item.text_field(FIELD_TITLE).unwrap_or_default(),
    );
    if let Some(description) = work_item.text_field(FIELD_DESCRIPTION) {
        item = item.with_description(description);
    }
    if let Some(state) = work_item.text_field(status_field) {
        item = item.with_status(state);
    }
    if let Some(kind) = work_item.text_field(FIELD_WORK_ITEM_TYPE) {
        item = item.with_item_type(kind);
    }
    item
}
