//! Clerk Directory Adapter
//!
//! HTTP adapter for the Clerk backend API:
//! - `GET /v1/users?limit=N` for the identity page
//! - `PATCH /v1/users/{id}/metadata` for the role claim
//!
//! The role claim lives in `public_metadata.role`; unknown values are
//! treated as absent and default to `user` downstream.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::shared::error::{IdentityError, Result};
use crate::user::entity::Role;

use super::{DirectoryClient, DirectoryIdentity};

/// Default Clerk API host
pub const DEFAULT_BASE_URL: &str = "https://api.clerk.com";

/// Configuration for the Clerk adapter
#[derive(Debug, Clone)]
pub struct ClerkConfig {
    /// API base URL (overridable for tests)
    pub base_url: String,
    /// Backend API secret key, sent as a bearer token
    pub secret_key: String,
}

impl ClerkConfig {
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            secret_key: secret_key.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Clerk identity directory adapter
pub struct ClerkDirectory {
    config: ClerkConfig,
    http: reqwest::Client,
}

impl ClerkDirectory {
    pub fn new(config: ClerkConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ClerkUser {
    id: String,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
    /// Older API versions expose the image under this name
    #[serde(default)]
    profile_image_url: Option<String>,
    #[serde(default)]
    email_addresses: Vec<ClerkEmailAddress>,
    #[serde(default)]
    public_metadata: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ClerkEmailAddress {
    email_address: String,
}

impl ClerkUser {
    fn into_identity(self) -> DirectoryIdentity {
        let role = self
            .public_metadata
            .get("role")
            .and_then(|v| v.as_str())
            .and_then(Role::parse);

        DirectoryIdentity {
            external_id: self.id,
            email_addresses: self
                .email_addresses
                .into_iter()
                .map(|e| e.email_address)
                .collect(),
            username: self.username,
            first_name: self.first_name,
            last_name: self.last_name,
            image_url: self.image_url.or(self.profile_image_url),
            role,
        }
    }
}

#[async_trait]
impl DirectoryClient for ClerkDirectory {
    async fn list_identities(&self, limit: u32) -> Result<Vec<DirectoryIdentity>> {
        let url = format!("{}/v1/users", self.config.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[("limit", limit)])
            .bearer_auth(&self.config.secret_key)
            .send()
            .await
            .map_err(|e| IdentityError::directory_unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(IdentityError::directory_unavailable(format!(
                "list returned {}",
                status
            )));
        }

        let users: Vec<ClerkUser> = response
            .json()
            .await
            .map_err(|e| IdentityError::directory_unavailable(e.to_string()))?;

        debug!(count = users.len(), "Fetched Clerk user page");
        Ok(users.into_iter().map(ClerkUser::into_identity).collect())
    }

    async fn set_role_claim(&self, external_id: &str, role: Role) -> Result<()> {
        let url = format!(
            "{}/v1/users/{}/metadata",
            self.config.base_url, external_id
        );
        let body = serde_json::json!({
            "public_metadata": { "role": role }
        });

        let response = self
            .http
            .patch(&url)
            .bearer_auth(&self.config.secret_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| IdentityError::directory_write(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(IdentityError::directory_write(format!(
                "metadata update returned {}",
                status
            )));
        }

        Ok(())
    }
}
