//! Port contracts for integration persistence and remote trackers.

mod connector;
mod repository;

pub use connector::{ConnectorError, ConnectorResult, RemoteConnector, RemoteConnectors};
pub use repository::{
    IntegrationRepository, IntegrationRepositoryError, IntegrationRepositoryResult,
};
