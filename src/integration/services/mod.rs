//! Service layer for integrations: registry, sync orchestration, push-back,
//! and sync status publication.

mod config;
mod push_back;
mod registry;
mod status;
mod sync;

pub use config::SyncConfig;
pub use push_back::{PushBackError, PushBackResult, PushBackService};
pub use registry::{
    IntegrationRegistryService, IntegrationRegistryServiceError, IntegrationRegistryServiceResult,
};
pub use status::{SyncRunGuard, SyncStatusBoard, SyncStatusUpdate};
pub use sync::{ImportProjectRequest, ImportedProject, SyncError, SyncServiceResult, SyncService};
