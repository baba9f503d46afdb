use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use std::fmt;

use crate::models::{Meeting, MeetingChanges, User, UserChanges};

/// Failure of a single storage call. No retries happen below this type.
#[derive(Debug)]
pub enum StoreError {
    /// Unique index violation (users.email).
    Duplicate,
    /// The operation exceeded its time bound.
    Timeout(&'static str),
    Backend(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Duplicate => write!(f, "duplicate key"),
            StoreError::Timeout(op) => write!(f, "{} timed out", op),
            StoreError::Backend(msg) => write!(f, "storage error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

/// Half-open interval `[start, end)` on a meeting's start time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeWindow {
    pub start: BsonDateTime,
    pub end: BsonDateTime,
}

impl TimeWindow {
    pub fn contains(&self, at: BsonDateTime) -> bool {
        at >= self.start && at < self.end
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with [`StoreError::Duplicate`] when the email is already taken.
    async fn insert_user(&self, user: &User) -> Result<(), StoreError>;

    async fn find_user(&self, id: ObjectId) -> Result<Option<User>, StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn list_users(&self) -> Result<Vec<User>, StoreError>;

    /// Returns the matched count.
    async fn update_user(&self, id: ObjectId, changes: &UserChanges) -> Result<u64, StoreError>;
}

#[async_trait]
pub trait MeetingStore: Send + Sync {
    /// Returns the stored id.
    async fn insert_meeting(&self, meeting: &Meeting) -> Result<ObjectId, StoreError>;

    async fn find_meeting(&self, id: ObjectId) -> Result<Option<Meeting>, StoreError>;

    /// Meetings created by `user` or listing `user` as participant, ordered by start time.
    async fn list_meetings_for(
        &self,
        user: ObjectId,
        window: Option<TimeWindow>,
    ) -> Result<Vec<Meeting>, StoreError>;

    /// Returns the matched count.
    async fn update_meeting(&self, id: ObjectId, changes: &MeetingChanges)
        -> Result<u64, StoreError>;

    /// Returns the deleted count.
    async fn delete_meeting(&self, id: ObjectId) -> Result<u64, StoreError>;
}
