//! In-memory remote connector for deterministic sync flows.

use crate::integration::{
    domain::{Integration, RemoteItem, RemoteStatusOption, RemoteSystem},
    ports::{ConnectorError, ConnectorResult, RemoteConnector},
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A field write observed by [`InMemoryRemoteConnector`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedFieldUpdate {
    /// Remote project written to.
    pub remote_project_id: String,
    /// Remote item written to.
    pub remote_item_id: String,
    /// Field written.
    pub field_id: String,
    /// Value written.
    pub value: String,
}

/// In-memory tracker keyed by remote project identifier.
///
/// Successful status writes are applied to the stored item, so a later fetch
/// observes them the way a real tracker would.
#[derive(Debug, Clone)]
pub struct InMemoryRemoteConnector {
    system: RemoteSystem,
    state: Arc<RwLock<InMemoryConnectorState>>,
}

#[derive(Debug, Default)]
struct InMemoryConnectorState {
    items: HashMap<String, Vec<RemoteItem>>,
    status_options: HashMap<String, Vec<RemoteStatusOption>>,
    fetch_failure: Option<ConnectorError>,
    update_failure: Option<ConnectorError>,
    updates: Vec<RecordedFieldUpdate>,
    fetch_count: usize,
}

impl InMemoryRemoteConnector {
    /// Creates an empty tracker impersonating `system`.
    #[must_use]
    pub fn new(system: RemoteSystem) -> Self {
        Self {
            system,
            state: Arc::default(),
        }
    }

    fn read(&self) -> ConnectorResult<RwLockReadGuard<'_, InMemoryConnectorState>> {
        self.state
            .read()
            .map_err(|err| ConnectorError::transport(std::io::Error::other(err.to_string())))
    }

    fn write(&self) -> ConnectorResult<RwLockWriteGuard<'_, InMemoryConnectorState>> {
        self.state
            .write()
            .map_err(|err| ConnectorError::transport(std::io::Error::other(err.to_string())))
    }

    /// Replaces the items of a project.
    ///
    /// # Errors
    ///
    /// Returns transport errors when lock acquisition fails.
    pub fn set_items(
        &self,
        remote_project_id: impl Into<String>,
        items: Vec<RemoteItem>,
    ) -> ConnectorResult<()> {
        self.write()?.items.insert(remote_project_id.into(), items);
        Ok(())
    }

    /// Replaces the status options of a project.
    ///
    /// # Errors
    ///
    /// Returns transport errors when lock acquisition fails.
    pub fn set_status_options(
        &self,
        remote_project_id: impl Into<String>,
        options: Vec<RemoteStatusOption>,
    ) -> ConnectorResult<()> {
        self.write()?
            .status_options
            .insert(remote_project_id.into(), options);
        Ok(())
    }

    /// Makes every subsequent fetch fail with `error`.
    ///
    /// # Errors
    ///
    /// Returns transport errors when lock acquisition fails.
    pub fn fail_fetches_with(&self, error: ConnectorError) -> ConnectorResult<()> {
        self.write()?.fetch_failure = Some(error);
        Ok(())
    }

    /// Makes every subsequent field update fail with `error`.
    ///
    /// # Errors
    ///
    /// Returns transport errors when lock acquisition fails.
    pub fn fail_updates_with(&self, error: ConnectorError) -> ConnectorResult<()> {
        self.write()?.update_failure = Some(error);
        Ok(())
    }

    /// Removes injected failures.
    ///
    /// # Errors
    ///
    /// Returns transport errors when lock acquisition fails.
    pub fn clear_failures(&self) -> ConnectorResult<()> {
        let mut state = self.write()?;
        state.fetch_failure = None;
        state.update_failure = None;
        Ok(())
    }

    /// Returns every successful field write in call order.
    ///
    /// # Errors
    ///
    /// Returns transport errors when lock acquisition fails.
    pub fn recorded_updates(&self) -> ConnectorResult<Vec<RecordedFieldUpdate>> {
        Ok(self.read()?.updates.clone())
    }

    /// Returns how many fetches were attempted.
    ///
    /// # Errors
    ///
    /// Returns transport errors when lock acquisition fails.
    pub fn fetch_count(&self) -> ConnectorResult<usize> {
        Ok(self.read()?.fetch_count)
    }
}

#[async_trait]
impl RemoteConnector for InMemoryRemoteConnector {
    fn system(&self) -> RemoteSystem {
        self.system
    }

    async fn fetch_items(&self, integration: &Integration) -> ConnectorResult<Vec<RemoteItem>> {
        let mut state = self.write()?;
        state.fetch_count += 1;
        if let Some(failure) = state.fetch_failure.clone() {
            return Err(failure);
        }

        let project_id = integration.remote_project_id();
        let items = state
            .items
            .get(project_id)
            .ok_or_else(|| ConnectorError::NotFound(project_id.to_owned()))?;
        Ok(items
            .iter()
            .filter(|item| integration.accepts_item_type(item.item_type.as_deref()))
            .cloned()
            .collect())
    }

    async fn update_field(
        &self,
        remote_project_id: &str,
        remote_item_id: &str,
        field_id: &str,
        value: &str,
    ) -> ConnectorResult<()> {
        let mut state = self.write()?;
        if let Some(failure) = state.update_failure.clone() {
            return Err(failure);
        }

        let item = state
            .items
            .get_mut(remote_project_id)
            .and_then(|items| items.iter_mut().find(|item| item.id == remote_item_id))
            .ok_or_else(|| {
                ConnectorError::NotFound(format!("{remote_project_id}/{remote_item_id}"))
            })?;
        item.status_value = Some(value.to_owned());

        state.updates.push(RecordedFieldUpdate {
            remote_project_id: remote_project_id.to_owned(),
            remote_item_id: remote_item_id.to_owned(),
            field_id: field_id.to_owned(),
            value: value.to_owned(),
        });
        Ok(())
    }

    async fn list_status_options(
        &self,
        remote_project_id: &str,
        _field_id: &str,
        _item_types: &[String],
    ) -> ConnectorResult<Vec<RemoteStatusOption>> {
        let state = self.read()?;
        Ok(state
            .status_options
            .get(remote_project_id)
            .cloned()
            .unwrap_or_default())
    }
}
