use chrono::{DateTime, Utc};
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime, Document};
use serde::{Deserialize, Serialize};

use super::to_chrono;

pub const DEFAULT_ROLE: &str = "User";

fn default_role() -> String {
    DEFAULT_ROLE.to_string()
}

/// User record as stored in MongoDB. Never serialized to HTTP responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default, rename = "nama", alias = "name")]
    pub name: String,
    pub email: String,
    /// bcrypt digest
    pub password: String,
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub profile_image: String,
    pub created_at: BsonDateTime,
    pub updated_at: BsonDateTime,
}

/// Public view of a user (no password field).
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    #[serde(rename = "nama")]
    pub name: String,
    pub email: String,
    pub role: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub bio: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub profile_image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        UserProfile {
            id: user.id.to_hex(),
            name: user.name,
            email: user.email,
            role: user.role,
            bio: user.bio,
            profile_image: user.profile_image,
            created_at: to_chrono(user.created_at),
            updated_at: to_chrono(user.updated_at),
        }
    }
}

// Request/Response structures
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(rename = "nama", alias = "name")]
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Fields a profile update may touch. Anything else in the body (including
/// `password`) is ignored.
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(rename = "nama", alias = "name")]
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub bio: Option<String>,
    pub profile_image: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
    pub user: UserProfile,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub user: UserProfile,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UserResponse {
    pub success: bool,
    pub user: UserProfile,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileImageResponse {
    pub success: bool,
    pub message: String,
    pub image_url: String,
}

/// Partial update applied by the user store. `updated_at` is always written.
#[derive(Debug, Clone)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub bio: Option<String>,
    pub profile_image: Option<String>,
    pub updated_at: BsonDateTime,
}

impl UserChanges {
    pub fn from_request(request: UpdateUserRequest, now: BsonDateTime) -> Self {
        UserChanges {
            name: request.name,
            email: request.email,
            role: request.role,
            bio: request.bio,
            profile_image: request.profile_image,
            updated_at: now,
        }
    }

    pub fn profile_image(url: &str, now: BsonDateTime) -> Self {
        UserChanges {
            name: None,
            email: None,
            role: None,
            bio: None,
            profile_image: Some(url.to_string()),
            updated_at: now,
        }
    }

    /// `$set` document for MongoDB.
    pub fn to_update_document(&self) -> Document {
        let mut set = doc! { "updatedAt": self.updated_at };
        if let Some(name) = &self.name {
            set.insert("nama", name);
        }
        if let Some(email) = &self.email {
            set.insert("email", email);
        }
        if let Some(role) = &self.role {
            set.insert("role", role);
        }
        if let Some(bio) = &self.bio {
            set.insert("bio", bio);
        }
        if let Some(profile_image) = &self.profile_image {
            set.insert("profileImage", profile_image);
        }
        doc! { "$set": set }
    }
}
