use chrono::{DateTime, Utc};
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime, Document};
use serde::{Deserialize, Serialize};

use super::to_chrono;

/// Duration in minutes used when a meeting is created without a positive one.
pub const DEFAULT_DURATION_MINUTES: i64 = 60;

/// Meeting record as stored in MongoDB.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start_time: BsonDateTime,
    /// Minutes
    pub duration: i64,
    pub created_by: ObjectId,
    #[serde(default)]
    pub participants: Vec<ObjectId>,
    #[serde(default)]
    pub emotion_tracking: bool,
    pub created_at: BsonDateTime,
    pub updated_at: BsonDateTime,
}

impl Meeting {
    pub fn is_creator(&self, user: &ObjectId) -> bool {
        &self.created_by == user
    }

    pub fn is_visible_to(&self, user: &ObjectId) -> bool {
        self.is_creator(user) || self.participants.contains(user)
    }
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeetingView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub duration: i64,
    pub created_by: String,
    pub participants: Vec<String>,
    pub emotion_tracking: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Meeting> for MeetingView {
    fn from(meeting: Meeting) -> Self {
        MeetingView {
            id: meeting.id.to_hex(),
            title: meeting.title,
            description: meeting.description,
            start_time: to_chrono(meeting.start_time),
            duration: meeting.duration,
            created_by: meeting.created_by.to_hex(),
            participants: meeting.participants.iter().map(|p| p.to_hex()).collect(),
            emotion_tracking: meeting.emotion_tracking,
            created_at: to_chrono(meeting.created_at),
            updated_at: to_chrono(meeting.updated_at),
        }
    }
}

#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateMeetingRequest {
    pub title: String,
    pub description: String,
    pub start_time: Option<DateTime<Utc>>,
    pub duration: i64,
    /// User ids (hex)
    pub participants: Vec<String>,
    pub emotion_tracking: bool,
}

/// Empty strings and non-positive durations count as "not supplied".
/// `emotionTracking` is always written and defaults to `false`.
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateMeetingRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub duration: Option<i64>,
    pub participants: Option<Vec<String>>,
    pub emotion_tracking: bool,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MeetingListQuery {
    /// Calendar day in server local time, `YYYY-MM-DD`
    pub date: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct MeetingResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub meeting: MeetingView,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct MeetingListResponse {
    pub success: bool,
    pub meetings: Vec<MeetingView>,
    pub total: usize,
}

/// Partial update applied by the meeting store.
#[derive(Debug, Clone)]
pub struct MeetingChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_time: Option<BsonDateTime>,
    pub duration: Option<i64>,
    pub participants: Option<Vec<ObjectId>>,
    pub emotion_tracking: bool,
    pub updated_at: BsonDateTime,
}

impl MeetingChanges {
    pub fn to_update_document(&self) -> Document {
        let mut set = doc! {
            "emotionTracking": self.emotion_tracking,
            "updatedAt": self.updated_at,
        };
        if let Some(title) = &self.title {
            set.insert("title", title);
        }
        if let Some(description) = &self.description {
            set.insert("description", description);
        }
        if let Some(start_time) = self.start_time {
            set.insert("startTime", start_time);
        }
        if let Some(duration) = self.duration {
            set.insert("duration", duration);
        }
        if let Some(participants) = &self.participants {
            set.insert("participants", participants.clone());
        }
        doc! { "$set": set }
    }
}
