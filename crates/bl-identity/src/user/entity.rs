//! User Entities
//!
//! Local persisted copy of directory identities, used for application-side
//! display and joins. The directory stays authoritative; these records are
//! overwritten on every list pass.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use utoipa::ToSchema;

use crate::directory::DirectoryIdentity;

/// Placeholder stored when the directory has no profile image
pub const DEFAULT_PROFILE_IMAGE: &str = "/default-profile.png";

/// Literal fallback when an identity carries no email address
pub const NO_EMAIL: &str = "No Email";

/// Literal fallback when neither names nor a handle are available
pub const NO_NAME: &str = "No Name";

/// Application role, mirrored from the directory's role claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular rider account
    User,
    /// Bus driver
    Driver,
    /// Back-office administrator
    Admin,
}

impl Default for Role {
    fn default() -> Self {
        Self::User
    }
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Driver => "driver",
            Self::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Self::User),
            "driver" => Some(Self::Driver),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Local user record (MongoDB `users` collection)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Directory identifier, doubles as the primary key
    #[serde(rename = "_id")]
    pub external_id: String,

    /// Denormalized primary email as of the last sync
    pub email: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    pub image_url: String,

    #[serde(default)]
    pub role: Role,

    /// Set once on first insert, never overwritten
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    /// Build the record a list pass would persist for this identity,
    /// applying the documented fallbacks for email, image, and role.
    pub fn from_directory(identity: &DirectoryIdentity) -> Self {
        Self {
            external_id: identity.external_id.clone(),
            email: identity
                .primary_email()
                .unwrap_or(NO_EMAIL)
                .to_string(),
            first_name: identity.first_name.clone(),
            last_name: identity.last_name.clone(),
            image_url: identity
                .image_url
                .clone()
                .unwrap_or_else(|| DEFAULT_PROFILE_IMAGE.to_string()),
            role: identity.role_or_default(),
            created_at: Utc::now(),
        }
    }

    /// Defaults used when a role change targets an identity that was never
    /// listed; the next list pass fills in the real directory attributes.
    pub fn with_defaults(external_id: impl Into<String>, role: Role) -> Self {
        Self {
            external_id: external_id.into(),
            email: NO_EMAIL.to_string(),
            first_name: None,
            last_name: None,
            image_url: DEFAULT_PROFILE_IMAGE.to_string(),
            role,
            created_at: Utc::now(),
        }
    }
}

/// Admin list view, one entry per directory identity
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub profile_image_url: String,
    pub role: Role,
}

impl UserView {
    /// Names and email come from the fresh directory fetch; image and role
    /// come from the upserted record (same values after a successful sync).
    pub fn project(identity: &DirectoryIdentity, record: &UserRecord) -> Self {
        Self {
            id: identity.external_id.clone(),
            full_name: identity
                .full_name()
                .unwrap_or_else(|| NO_NAME.to_string()),
            email: record.email.clone(),
            profile_image_url: record.image_url.clone(),
            role: record.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_identity(id: &str) -> DirectoryIdentity {
        DirectoryIdentity {
            external_id: id.to_string(),
            email_addresses: vec![],
            username: None,
            first_name: None,
            last_name: None,
            image_url: None,
            role: None,
        }
    }

    #[test]
    fn role_round_trips_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Driver).unwrap(), "\"driver\"");
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("superuser"), None);
        assert_eq!(Role::default(), Role::User);
    }

    #[test]
    fn record_from_bare_identity_applies_fallbacks() {
        let record = UserRecord::from_directory(&bare_identity("ext-1"));
        assert_eq!(record.email, NO_EMAIL);
        assert_eq!(record.image_url, DEFAULT_PROFILE_IMAGE);
        assert_eq!(record.role, Role::User);
    }

    #[test]
    fn full_name_prefers_both_names_then_handle() {
        let mut identity = bare_identity("ext-1");
        identity.username = Some("jdoe".to_string());
        assert_eq!(identity.full_name().as_deref(), Some("jdoe"));

        identity.first_name = Some("Jane".to_string());
        // A single name is not enough; the handle still wins.
        assert_eq!(identity.full_name().as_deref(), Some("jdoe"));

        identity.last_name = Some("Doe".to_string());
        assert_eq!(identity.full_name().as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn view_falls_back_to_no_name() {
        let identity = bare_identity("ext-1");
        let record = UserRecord::from_directory(&identity);
        let view = UserView::project(&identity, &record);
        assert_eq!(view.full_name, NO_NAME);
        assert_eq!(view.email, NO_EMAIL);
        assert_eq!(view.role, Role::User);
    }
}
