use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};

use super::{bounded, MeetingStore, MongoDB, StoreError, TimeWindow};
use crate::models::{Meeting, MeetingChanges};

#[async_trait]
impl MeetingStore for MongoDB {
    async fn insert_meeting(&self, meeting: &Meeting) -> Result<ObjectId, StoreError> {
        let result = bounded("insert_meeting", self.meetings().insert_one(meeting)).await?;
        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| StoreError::Backend("inserted id is not an ObjectId".to_string()))
    }

    async fn find_meeting(&self, id: ObjectId) -> Result<Option<Meeting>, StoreError> {
        bounded("find_meeting", self.meetings().find_one(doc! { "_id": id })).await
    }

    async fn list_meetings_for(
        &self,
        user: ObjectId,
        window: Option<TimeWindow>,
    ) -> Result<Vec<Meeting>, StoreError> {
        let mut filter = doc! {
            "$or": [
                { "createdBy": user },
                { "participants": user },
            ]
        };
        if let Some(window) = window {
            filter.insert(
                "startTime",
                doc! { "$gte": window.start, "$lt": window.end },
            );
        }

        bounded("list_meetings", async {
            let cursor = self
                .meetings()
                .find(filter)
                .sort(doc! { "startTime": 1 })
                .await?;
            cursor.try_collect::<Vec<Meeting>>().await
        })
        .await
    }

    async fn update_meeting(
        &self,
        id: ObjectId,
        changes: &MeetingChanges,
    ) -> Result<u64, StoreError> {
        let result = bounded(
            "update_meeting",
            self.meetings()
                .update_one(doc! { "_id": id }, changes.to_update_document()),
        )
        .await?;
        Ok(result.matched_count)
    }

    async fn delete_meeting(&self, id: ObjectId) -> Result<u64, StoreError> {
        let result = bounded(
            "delete_meeting",
            self.meetings().delete_one(doc! { "_id": id }),
        )
        .await?;
        Ok(result.deleted_count)
    }
}
