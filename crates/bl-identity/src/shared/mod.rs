//! Shared infrastructure: errors, health probes, and the role sync service.

pub mod error;
pub mod health_api;
pub mod role_sync_service;

pub use error::{ErrorResponse, IdentityError, Result};
pub use health_api::{health_router, HealthState, HealthStatus};
pub use role_sync_service::{RoleSyncService, DIRECTORY_PAGE_LIMIT};
