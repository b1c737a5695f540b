//! Domain model for integrations, field mappings, and sync results.

mod error;
mod ids;
mod integration;
mod mapping;
mod remote_item;
mod suggestion;
mod sync;
mod system;

pub use error::IntegrationDomainError;
pub use ids::IntegrationId;
pub use integration::{Integration, NewIntegration, PersistedIntegrationData};
pub use mapping::{FieldMapping, LocalField, resolve_local_status};
pub use remote_item::RemoteItem;
pub use suggestion::{RemoteStatusOption, StatusSuggestion, suggest_field_mapping, suggest_status};
pub use sync::{SyncResult, SyncStatus};
pub use system::RemoteSystem;
