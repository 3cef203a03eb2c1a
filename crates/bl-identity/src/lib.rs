//! Busline Identity
//!
//! User-role synchronization between the external identity directory and
//! the local MongoDB user store, plus the admin REST API built on top:
//! - Directory adapters behind the [`DirectoryClient`] capability trait
//! - Local `users` collection access behind [`UserStore`]
//! - [`RoleSyncService`] reconciliation (list sync and role-change saga)
//! - Users admin endpoints and health probes
//!
//! ## Module Organization (Aggregate-based)
//!
//! The `user` aggregate contains:
//! - `entity` - Domain entities
//! - `repository` - Data access
//! - `api` - REST endpoints

// Core aggregate
pub mod user;

// External collaborators
pub mod directory;

// Shared infrastructure
pub mod shared;

// Re-export common types from shared
pub use shared::error::{ErrorResponse, IdentityError, Result};
pub use shared::health_api::{health_router, HealthState, HealthStatus};
pub use shared::role_sync_service::{RoleSyncService, DIRECTORY_PAGE_LIMIT};

// Re-export main entity types for convenience
pub use user::entity::{Role, UserRecord, UserView};

// Re-export repositories
pub use user::repository::{UserRepository, UserStore};

// Re-export directory adapters
pub use directory::clerk::{ClerkConfig, ClerkDirectory};
pub use directory::{DirectoryClient, DirectoryIdentity};

// Re-export API state and routers
pub use user::api::{users_router, MessageResponse, RoleChangeRequest, UsersState};
