//! GitHub Projects connector.
//!
//! Translates project items and single-select status fields exposed by a
//! [`GitHubProjectsApi`] client into the generic [`RemoteConnector`]
//! contract. Pagination and authentication belong to the API client.

use crate::integration::{
    domain::{Integration, RemoteItem, RemoteStatusOption, RemoteSystem},
    ports::{ConnectorError, ConnectorResult, RemoteConnector},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the built-in status field on GitHub project boards.
const DEFAULT_STATUS_FIELD_NAME: &str = "Status";

/// Kind of content a project item wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GitHubContentType {
    /// Repository issue.
    Issue,
    /// Repository pull request.
    PullRequest,
    /// Draft issue living only on the project.
    DraftIssue,
}

impl GitHubContentType {
    /// Returns the GraphQL type name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Issue => "Issue",
            Self::PullRequest => "PullRequest",
            Self::DraftIssue => "DraftIssue",
        }
    }
}

impl fmt::Display for GitHubContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Single-select value set on a project item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubFieldValue {
    /// Project field node id.
    pub field_id: String,
    /// Project field display name.
    pub field_name: String,
    /// Selected option name, if any.
    pub option_name: Option<String>,
}

/// Project item as returned by the projects API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubProjectItem {
    /// Project item node id.
    pub id: String,
    /// Wrapped content kind. `None` for redacted content.
    pub content_type: Option<GitHubContentType>,
    /// Content title.
    pub title: String,
    /// Content body.
    pub body: Option<String>,
    /// Single-select field values.
    pub field_values: Vec<GitHubFieldValue>,
}

/// Option of a single-select project field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubFieldOption {
    /// Option id used when writing the field.
    pub id: String,
    /// Option display name.
    pub name: String,
}

/// Raw GitHub Projects client consumed by [`GitHubProjectsConnector`].
#[async_trait]
pub trait GitHubProjectsApi: Send + Sync {
    /// Lists every item of a project, following pagination.
    async fn list_project_items(&self, project_id: &str)
    -> ConnectorResult<Vec<GitHubProjectItem>>;

    /// Lists the options of a single-select field.
    async fn list_single_select_options(
        &self,
        project_id: &str,
        field_id: &str,
    ) -> ConnectorResult<Vec<GitHubFieldOption>>;

    /// Sets a single-select field of one item to an option.
    async fn set_single_select_value(
        &self,
        project_id: &str,
        item_id: &str,
        field_id: &str,
        option_id: &str,
    ) -> ConnectorResult<()>;
}

/// [`RemoteConnector`] for GitHub Projects.
#[derive(Debug, Clone)]
pub struct GitHubProjectsConnector<A>
where
    A: GitHubProjectsApi,
{
    api: A,
}

impl<A> GitHubProjectsConnector<A>
where
    A: GitHubProjectsApi,
{
    /// Creates a connector over an API client.
    #[must_use]
    pub const fn new(api: A) -> Self {
        Self { api }
    }
}

#[async_trait]
impl<A> RemoteConnector for GitHubProjectsConnector<A>
where
    A: GitHubProjectsApi,
{
    fn system(&self) -> RemoteSystem {
        RemoteSystem::GitHub
    }

    async fn fetch_items(&self, integration: &Integration) -> ConnectorResult<Vec<RemoteItem>> {
        let items = self
            .api
            .list_project_items(integration.remote_project_id())
            .await?;
        let status_field_id = integration.push_back_field_id();

        Ok(items
            .into_iter()
            .filter(|item| {
                integration.accepts_item_type(item.content_type.map(GitHubContentType::as_str))
            })
            .map(|item| to_remote_item(item, status_field_id))
            .collect())
    }

    async fn update_field(
        &self,
        remote_project_id: &str,
        remote_item_id: &str,
        field_id: &str,
        value: &str,
    ) -> ConnectorResult<()> {
        let options = self
            .api
            .list_single_select_options(remote_project_id, field_id)
            .await?;
        let option = options
            .iter()
            .find(|option| option.name == value)
            .ok_or_else(|| {
                ConnectorError::InvalidRequest(format!(
                    "field {field_id} has no option named '{value}'"
                ))
            })?;

        self.api
            .set_single_select_value(remote_project_id, remote_item_id, field_id, &option.id)
            .await
    }

    async fn list_status_options(
        &self,
        remote_project_id: &str,
        field_id: &str,
        _item_types: &[String],
    ) -> ConnectorResult<Vec<RemoteStatusOption>> {
        let options = self
            .api
            .list_single_select_options(remote_project_id, field_id)
            .await?;
        Ok(options
            .into_iter()
            .map(|option| RemoteStatusOption::new(option.name))
            .collect())
    }
}

fn to_remote_item(item: GitHubProjectItem, status_field_id: Option<&str>) -> RemoteItem {
    let status = status_value(&item.field_values, status_field_id).map(str::to_owned);
    let mut remote = RemoteItem::new(item.id, item.title);
    if let Some(body) = item.body {
        remote = remote.with_description(body);
    }
    if let Some(value) = status {
        remote = remote.with_status(value);
    }
    if let Some(kind) = item.content_type {
        remote = remote.with_item_type(kind.as_str());
    }
    remote
}

fn status_value<'a>(
    values: &'a [GitHubFieldValue],
    status_field_id: Option<&str>,
) -> Option<&'a str> {
    let field = match status_field_id {
        Some(id) => values.iter().find(|value| value.field_id == id),
        None => values
            .iter()
            .find(|value| value.field_name.eq_ignore_ascii_case(DEFAULT_STATUS_FIELD_NAME)),
    };
    field.and_then(|value| value.option_name.as_deref())
}
