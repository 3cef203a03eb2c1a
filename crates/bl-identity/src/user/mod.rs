//! User aggregate: persisted records, repository, and the admin REST API.

pub mod api;
pub mod entity;
pub mod repository;

pub use api::{users_router, MessageResponse, RoleChangeRequest, UsersState};
pub use entity::{Role, UserRecord, UserView};
pub use repository::{UserRepository, UserStore};
