//! Users Admin API
//!
//! REST endpoints consumed by the admin front end: list users (with
//! directory sync) and promote/demote role mutations.

use axum::{extract::State, Json};
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa::ToSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::shared::error::{ErrorResponse, IdentityError};
use crate::shared::role_sync_service::RoleSyncService;
use crate::user::entity::UserView;

/// Role change request body
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleChangeRequest {
    /// Directory identifier of the target user
    pub user_id: Option<String>,
}

/// Confirmation message response
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Users service state
#[derive(Clone)]
pub struct UsersState {
    pub sync: Arc<RoleSyncService>,
}

// A missing, malformed, or empty body all reduce to a missing userId, so
// every 400 carries the same {error, message} shape.
fn require_user_id(body: &Option<Json<RoleChangeRequest>>) -> Result<&str, IdentityError> {
    body.as_ref()
        .and_then(|req| req.user_id.as_deref())
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| IdentityError::missing_parameter("userId"))
}

/// List users, syncing the local store from the directory
#[utoipa::path(
    get,
    path = "",
    tag = "users",
    responses(
        (status = 200, description = "Users fetched and synchronized", body = Vec<UserView>),
        (status = 500, description = "Directory or store failure", body = ErrorResponse)
    )
)]
pub async fn list_users(
    State(state): State<UsersState>,
) -> Result<Json<Vec<UserView>>, IdentityError> {
    let users = state.sync.list_users().await?;
    Ok(Json(users))
}

/// Promote a user to driver
#[utoipa::path(
    post,
    path = "/make-driver",
    tag = "users",
    request_body = RoleChangeRequest,
    responses(
        (status = 200, description = "Role updated", body = MessageResponse),
        (status = 400, description = "Missing userId", body = ErrorResponse),
        (status = 500, description = "Directory or store failure", body = ErrorResponse)
    )
)]
pub async fn make_driver(
    State(state): State<UsersState>,
    body: Option<Json<RoleChangeRequest>>,
) -> Result<Json<MessageResponse>, IdentityError> {
    let user_id = require_user_id(&body)?;
    let message = state.sync.promote_to_driver(user_id).await?;
    Ok(Json(MessageResponse { message }))
}

/// Promote a user to admin
#[utoipa::path(
    post,
    path = "/make-admin",
    tag = "users",
    request_body = RoleChangeRequest,
    responses(
        (status = 200, description = "Role updated", body = MessageResponse),
        (status = 400, description = "Missing userId", body = ErrorResponse),
        (status = 500, description = "Directory or store failure", body = ErrorResponse)
    )
)]
pub async fn make_admin(
    State(state): State<UsersState>,
    body: Option<Json<RoleChangeRequest>>,
) -> Result<Json<MessageResponse>, IdentityError> {
    let user_id = require_user_id(&body)?;
    let message = state.sync.promote_to_admin(user_id).await?;
    Ok(Json(MessageResponse { message }))
}

/// Reset a user's role back to plain user
#[utoipa::path(
    post,
    path = "/remove-role",
    tag = "users",
    request_body = RoleChangeRequest,
    responses(
        (status = 200, description = "Role reset", body = MessageResponse),
        (status = 400, description = "Missing userId", body = ErrorResponse),
        (status = 500, description = "Directory or store failure", body = ErrorResponse)
    )
)]
pub async fn remove_role(
    State(state): State<UsersState>,
    body: Option<Json<RoleChangeRequest>>,
) -> Result<Json<MessageResponse>, IdentityError> {
    let user_id = require_user_id(&body)?;
    let message = state.sync.revoke_to_user(user_id).await?;
    Ok(Json(MessageResponse { message }))
}

/// Create the users router
pub fn users_router(state: UsersState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(list_users))
        .routes(routes!(make_driver))
        .routes(routes!(make_admin))
        .routes(routes!(remove_role))
        .with_state(state)
}
