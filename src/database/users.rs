use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};

use super::{bounded, MongoDB, StoreError, UserStore};
use crate::models::{User, UserChanges};

#[async_trait]
impl UserStore for MongoDB {
    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        bounded("insert_user", self.users().insert_one(user)).await?;
        Ok(())
    }

    async fn find_user(&self, id: ObjectId) -> Result<Option<User>, StoreError> {
        bounded("find_user", self.users().find_one(doc! { "_id": id })).await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        bounded(
            "find_user_by_email",
            self.users().find_one(doc! { "email": email }),
        )
        .await
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        bounded("list_users", async {
            let cursor = self
                .users()
                .find(doc! {})
                .sort(doc! { "createdAt": 1 })
                .await?;
            cursor.try_collect::<Vec<User>>().await
        })
        .await
    }

    async fn update_user(&self, id: ObjectId, changes: &UserChanges) -> Result<u64, StoreError> {
        let result = bounded(
            "update_user",
            self.users()
                .update_one(doc! { "_id": id }, changes.to_update_document()),
        )
        .await?;
        Ok(result.matched_count)
    }
}
