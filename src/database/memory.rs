//! In-process store used by the test suite. Mirrors the MongoDB semantics
//! the handlers rely on: unique emails, matched/deleted counts, start-time
//! windows and ordering.

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::sync::Mutex;

use super::{MeetingStore, StoreError, TimeWindow, UserStore};
use crate::models::{Meeting, MeetingChanges, User, UserChanges};

#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<User>>,
    meetings: Mutex<Vec<Meeting>>,
}

impl MemoryStore {
    pub fn user_count(&self) -> usize {
        self.users.lock().unwrap().len()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate);
        }
        users.push(user.clone());
        Ok(())
    }

    async fn find_user(&self, id: ObjectId) -> Result<Option<User>, StoreError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let mut users = self.users.lock().unwrap().clone();
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }

    async fn update_user(&self, id: ObjectId, changes: &UserChanges) -> Result<u64, StoreError> {
        let mut users = self.users.lock().unwrap();
        if let Some(email) = &changes.email {
            if users.iter().any(|u| u.id != id && &u.email == email) {
                return Err(StoreError::Duplicate);
            }
        }
        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(0);
        };
        if let Some(name) = &changes.name {
            user.name = name.clone();
        }
        if let Some(email) = &changes.email {
            user.email = email.clone();
        }
        if let Some(role) = &changes.role {
            user.role = role.clone();
        }
        if let Some(bio) = &changes.bio {
            user.bio = bio.clone();
        }
        if let Some(profile_image) = &changes.profile_image {
            user.profile_image = profile_image.clone();
        }
        user.updated_at = changes.updated_at;
        Ok(1)
    }
}

#[async_trait]
impl MeetingStore for MemoryStore {
    async fn insert_meeting(&self, meeting: &Meeting) -> Result<ObjectId, StoreError> {
        self.meetings.lock().unwrap().push(meeting.clone());
        Ok(meeting.id)
    }

    async fn find_meeting(&self, id: ObjectId) -> Result<Option<Meeting>, StoreError> {
        Ok(self
            .meetings
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.id == id)
            .cloned())
    }

    async fn list_meetings_for(
        &self,
        user: ObjectId,
        window: Option<TimeWindow>,
    ) -> Result<Vec<Meeting>, StoreError> {
        let mut found: Vec<Meeting> = self
            .meetings
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.is_visible_to(&user))
            .filter(|m| window.map_or(true, |w| w.contains(m.start_time)))
            .cloned()
            .collect();
        found.sort_by_key(|m| m.start_time);
        Ok(found)
    }

    async fn update_meeting(
        &self,
        id: ObjectId,
        changes: &MeetingChanges,
    ) -> Result<u64, StoreError> {
        let mut meetings = self.meetings.lock().unwrap();
        let Some(meeting) = meetings.iter_mut().find(|m| m.id == id) else {
            return Ok(0);
        };
        if let Some(title) = &changes.title {
            meeting.title = title.clone();
        }
        if let Some(description) = &changes.description {
            meeting.description = description.clone();
        }
        if let Some(start_time) = changes.start_time {
            meeting.start_time = start_time;
        }
        if let Some(duration) = changes.duration {
            meeting.duration = duration;
        }
        if let Some(participants) = &changes.participants {
            meeting.participants = participants.clone();
        }
        meeting.emotion_tracking = changes.emotion_tracking;
        meeting.updated_at = changes.updated_at;
        Ok(1)
    }

    async fn delete_meeting(&self, id: ObjectId) -> Result<u64, StoreError> {
        let mut meetings = self.meetings.lock().unwrap();
        let before = meetings.len();
        meetings.retain(|m| m.id != id);
        Ok((before - meetings.len()) as u64)
    }
}
