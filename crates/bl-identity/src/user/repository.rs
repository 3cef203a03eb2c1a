//! User Repository

use async_trait::async_trait;
use mongodb::{
    bson::doc,
    options::ReturnDocument,
    Collection, Database,
};

use crate::shared::error::{IdentityError, Result};
use crate::user::entity::{Role, UserRecord};

/// Persistence seam for local user records.
///
/// Write failures surface as `LocalWriteFailed` so callers can distinguish
/// them from directory errors.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Create-or-replace keyed by external id; denormalized fields and role
    /// are overwritten, `createdAt` is preserved.
    async fn upsert(&self, record: &UserRecord) -> Result<UserRecord>;

    /// Set only the role, creating the record with defaults if the identity
    /// was never listed.
    async fn set_role(&self, external_id: &str, role: Role) -> Result<()>;
}

pub struct UserRepository {
    collection: Collection<UserRecord>,
}

impl UserRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("users"),
        }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn upsert(&self, record: &UserRecord) -> Result<UserRecord> {
        let updated = self
            .collection
            .find_one_and_update(
                doc! { "_id": &record.external_id },
                doc! {
                    "$set": {
                        "email": &record.email,
                        "firstName": record.first_name.as_deref(),
                        "lastName": record.last_name.as_deref(),
                        "imageUrl": &record.image_url,
                        "role": record.role.as_str(),
                    },
                    "$setOnInsert": {
                        "createdAt": bson::DateTime::from_chrono(record.created_at),
                    },
                },
            )
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| IdentityError::local_write(e.to_string()))?;

        updated.ok_or_else(|| IdentityError::local_write("upsert returned no document"))
    }

    async fn set_role(&self, external_id: &str, role: Role) -> Result<()> {
        let defaults = UserRecord::with_defaults(external_id, role);
        self.collection
            .update_one(
                doc! { "_id": external_id },
                doc! {
                    "$set": { "role": role.as_str() },
                    "$setOnInsert": {
                        "email": &defaults.email,
                        "imageUrl": &defaults.image_url,
                        "createdAt": bson::DateTime::from_chrono(defaults.created_at),
                    },
                },
            )
            .upsert(true)
            .await
            .map_err(|e| IdentityError::local_write(e.to_string()))?;
        Ok(())
    }
}
