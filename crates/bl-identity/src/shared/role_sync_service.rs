//! Role Sync Service
//!
//! Reconciles user role state between the external identity directory and
//! the local `users` collection. The directory is the source of truth for
//! identity and role claims; the local store keeps a denormalized copy for
//! application-side display and joins.
//!
//! Role changes are a two-step saga: the directory claim is written first
//! (fail closed - a directory failure leaves the local record untouched),
//! then the local record. A local failure after a successful directory
//! write leaves the stores divergent until the next list pass reconciles
//! them; the two failure modes are reported distinctly so callers know a
//! retry is safe.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::directory::DirectoryClient;
use crate::shared::error::{IdentityError, Result};
use crate::user::entity::{Role, UserRecord, UserView};
use crate::user::repository::UserStore;

/// Page cap for directory list calls
pub const DIRECTORY_PAGE_LIMIT: u32 = 50;

/// Role Sync Service
pub struct RoleSyncService {
    directory: Arc<dyn DirectoryClient>,
    users: Arc<dyn UserStore>,
}

impl RoleSyncService {
    pub fn new(directory: Arc<dyn DirectoryClient>, users: Arc<dyn UserStore>) -> Self {
        Self { directory, users }
    }

    /// Fetch one page of identities and sync each one to the local store.
    ///
    /// The upsert is create-or-replace: the directory is authoritative on
    /// every list call, so stale denormalized fields and roles are
    /// overwritten. Upserts are not atomic across the batch - records
    /// written before a mid-batch failure stay committed (at-least-once).
    pub async fn list_users(&self) -> Result<Vec<UserView>> {
        let identities = self.directory.list_identities(DIRECTORY_PAGE_LIMIT).await?;
        debug!(count = identities.len(), "Fetched directory page");

        let mut views = Vec::with_capacity(identities.len());
        for identity in &identities {
            let record = UserRecord::from_directory(identity);
            let stored = self.users.upsert(&record).await?;
            views.push(UserView::project(identity, &stored));
        }

        info!(synced = views.len(), "Directory list synchronized");
        Ok(views)
    }

    /// Set an identity's role in both stores, directory first.
    ///
    /// Idempotent: repeating the call with the same arguments yields the
    /// same end state.
    pub async fn set_role(&self, user_id: &str, role: Role) -> Result<String> {
        if user_id.trim().is_empty() {
            return Err(IdentityError::missing_parameter("userId"));
        }

        // Directory first: the claim is the authorization-relevant state,
        // and a failed claim write must leave the local record untouched.
        self.directory.set_role_claim(user_id, role).await?;

        if let Err(err) = self.users.set_role(user_id, role).await {
            warn!(
                user_id = %user_id,
                role = %role,
                error = %err,
                "Local role write failed after directory update; stores diverge until next list"
            );
            return Err(err);
        }

        info!(user_id = %user_id, role = %role, "Role updated");
        Ok(match role {
            Role::Driver => format!("User {} is now a driver.", user_id),
            Role::Admin => format!("User {} is now an admin.", user_id),
            Role::User => format!("User {} role has been reset to 'user'.", user_id),
        })
    }

    pub async fn promote_to_driver(&self, user_id: &str) -> Result<String> {
        self.set_role(user_id, Role::Driver).await
    }

    pub async fn promote_to_admin(&self, user_id: &str) -> Result<String> {
        self.set_role(user_id, Role::Admin).await
    }

    pub async fn revoke_to_user(&self, user_id: &str) -> Result<String> {
        self.set_role(user_id, Role::User).await
    }
}
