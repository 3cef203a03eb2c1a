//! Identity Directory Adapters
//!
//! The external directory is the system of record for authentication
//! identity and role claims. Access goes through the [`DirectoryClient`]
//! capability trait so the sync logic can be exercised against a fake;
//! the Clerk HTTP adapter is the production implementation.

pub mod clerk;

use async_trait::async_trait;

use crate::shared::error::Result;
use crate::user::entity::Role;

/// An identity as reported by the external directory.
#[derive(Debug, Clone)]
pub struct DirectoryIdentity {
    /// Opaque stable identifier assigned by the provider
    pub external_id: String,
    /// Ordered email addresses; the first entry is the primary contact
    pub email_addresses: Vec<String>,
    /// Provider-supplied handle, used as a display-name fallback
    pub username: Option<String>,
    /// First/given name
    pub first_name: Option<String>,
    /// Last/family name
    pub last_name: Option<String>,
    /// Profile image URL
    pub image_url: Option<String>,
    /// Role claim from provider metadata; absent means `user`
    pub role: Option<Role>,
}

impl DirectoryIdentity {
    pub fn primary_email(&self) -> Option<&str> {
        self.email_addresses.first().map(|s| s.as_str())
    }

    /// Role claim with the documented default applied.
    pub fn role_or_default(&self) -> Role {
        self.role.unwrap_or_default()
    }

    /// `"{first} {last}"` when both names are present, else the handle.
    pub fn full_name(&self) -> Option<String> {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => Some(format!("{} {}", first, last)),
            _ => self.username.clone(),
        }
    }
}

/// Capability interface over the external identity directory.
#[async_trait]
pub trait DirectoryClient: Send + Sync {
    /// Fetch one bounded page of identities.
    ///
    /// Fails with `DirectoryUnavailable` on any transport or provider error.
    async fn list_identities(&self, limit: u32) -> Result<Vec<DirectoryIdentity>>;

    /// Update an identity's role claim in provider metadata.
    ///
    /// Fails with `DirectoryWriteFailed` on any transport or provider error.
    async fn set_role_claim(&self, external_id: &str, role: Role) -> Result<()>;
}
