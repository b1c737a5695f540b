//! Remote connector port: the boundary between the sync engine and a
//! tracker's API.

use crate::integration::domain::{Integration, RemoteItem, RemoteStatusOption, RemoteSystem};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Result type for remote connector operations.
pub type ConnectorResult<T> = Result<T, ConnectorError>;

/// Tracker-specific adapter consumed by the sync and push-back services.
///
/// Authentication, rate limiting, pagination, and request timeouts are the
/// connector's concern.
#[async_trait]
pub trait RemoteConnector: Send + Sync {
    /// Tracker this connector talks to.
    fn system(&self) -> RemoteSystem;

    /// Fetches every remote item selected by the integration's filters.
    async fn fetch_items(&self, integration: &Integration) -> ConnectorResult<Vec<RemoteItem>>;

    /// Writes one field of one remote item.
    async fn update_field(
        &self,
        remote_project_id: &str,
        remote_item_id: &str,
        field_id: &str,
        value: &str,
    ) -> ConnectorResult<()>;

    /// Lists the values a remote status field accepts.
    ///
    /// `item_types` narrows the listing on trackers whose states depend on
    /// the item type; connectors without that notion ignore it.
    async fn list_status_options(
        &self,
        remote_project_id: &str,
        field_id: &str,
        item_types: &[String],
    ) -> ConnectorResult<Vec<RemoteStatusOption>>;
}

/// Errors returned by remote connectors.
#[derive(Debug, Clone, Error)]
pub enum ConnectorError {
    /// Credentials were rejected (HTTP 401).
    #[error("remote rejected credentials: {0}")]
    Unauthorized(String),

    /// Credentials lack permission (HTTP 403).
    #[error("remote denied access: {0}")]
    Forbidden(String),

    /// The remote project, item, or field does not exist (HTTP 404).
    #[error("remote resource not found: {0}")]
    NotFound(String),

    /// Any other unsuccessful HTTP status.
    #[error("remote request failed with status {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response message.
        message: String,
    },

    /// The connector refused to build a request from the given input.
    #[error("invalid remote request: {0}")]
    InvalidRequest(String),

    /// The remote answered with a payload the connector cannot interpret.
    #[error("invalid remote response: {0}")]
    InvalidResponse(String),

    /// Network-level failure.
    #[error("remote transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl ConnectorError {
    /// Classifies an unsuccessful HTTP status.
    #[must_use]
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let text = message.into();
        match status {
            401 => Self::Unauthorized(text),
            403 => Self::Forbidden(text),
            404 => Self::NotFound(text),
            _ => Self::Http {
                status,
                message: text,
            },
        }
    }

    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }

    /// Reports whether the user should be asked to re-authenticate.
    #[must_use]
    pub const fn requires_reauthentication(&self) -> bool {
        matches!(self, Self::Unauthorized(_) | Self::Forbidden(_))
    }
}

/// Connector strategies keyed by the tracker they serve.
#[derive(Clone, Default)]
pub struct RemoteConnectors {
    connectors: HashMap<RemoteSystem, Arc<dyn RemoteConnector>>,
}

impl RemoteConnectors {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a connector under the system it reports, replacing any
    /// previous one.
    #[must_use]
    pub fn with(mut self, connector: Arc<dyn RemoteConnector>) -> Self {
        self.connectors.insert(connector.system(), connector);
        self
    }

    /// Returns the connector for a tracker.
    #[must_use]
    pub fn get(&self, system: RemoteSystem) -> Option<&Arc<dyn RemoteConnector>> {
        self.connectors.get(&system)
    }
}

impl fmt::Debug for RemoteConnectors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.connectors.keys()).finish()
    }
}
