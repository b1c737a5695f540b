//! In-memory adapters for integration records and remote trackers.

mod connector;
mod registry;

pub use connector::{InMemoryRemoteConnector, RecordedFieldUpdate};
pub use registry::InMemoryIntegrationRepository;
