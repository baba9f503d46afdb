mod meetings;
mod store;
mod users;

#[cfg(test)]
pub mod memory;

pub use store::*;

use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::bson::{doc, Document};
use mongodb::{options::IndexOptions, Client, Collection, IndexModel};
use std::error::Error;
use std::future::IntoFuture;
use std::time::Duration;

use crate::config::Config;
use crate::models::{Meeting, User};

/// Upper bound for every single storage call.
pub const OPERATION_TIMEOUT: Duration = Duration::from_secs(10);

const DUPLICATE_KEY: i32 = 11000;

#[derive(Clone)]
pub struct MongoDB {
    users: Collection<User>,
    meetings: Collection<Meeting>,
}

impl MongoDB {
    pub async fn connect(config: &Config) -> Result<Self, Box<dyn Error>> {
        let mut client_options = mongodb::options::ClientOptions::parse(&config.mongodb_uri).await?;

        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(5);
        client_options.max_idle_time = Some(Duration::from_secs(300));

        client_options.connect_timeout = Some(Duration::from_secs(5));
        client_options.server_selection_timeout = Some(Duration::from_secs(5));

        let client = Client::with_options(client_options)?;
        let db = client.database(&config.database_name);

        // Test connection
        db.list_collection_names().await?;
        log::info!("✅ Connected to MongoDB database: {}", config.database_name);

        let mongodb = Self {
            users: db.collection(&config.user_collection),
            meetings: db.collection(&config.meeting_collection),
        };

        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    /// Email uniqueness lives in the index; a failure to build it is fatal.
    async fn ensure_indexes(&self) -> Result<(), Box<dyn Error>> {
        log::info!("🔧 Creating database indexes...");

        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.users.create_index(email_index).await?;
        log::info!("   ✅ Index created: users(email) unique");

        for key in ["createdBy", "participants", "startTime"] {
            let mut keys = Document::new();
            keys.insert(key, 1);
            let index = IndexModel::builder().keys(keys).build();
            match self.meetings.create_index(index).await {
                Ok(_) => log::info!("   ✅ Index created: meetings({})", key),
                Err(e) => log::debug!("   ℹ️  Index not created for meetings({}): {}", key, e),
            }
        }

        log::info!("✅ Database indexes ready");
        Ok(())
    }

    pub(crate) fn users(&self) -> &Collection<User> {
        &self.users
    }

    pub(crate) fn meetings(&self) -> &Collection<Meeting> {
        &self.meetings
    }
}

/// Runs one storage call under [`OPERATION_TIMEOUT`].
pub(crate) async fn bounded<T, F>(op: &'static str, fut: F) -> Result<T, StoreError>
where
    F: IntoFuture<Output = mongodb::error::Result<T>>,
{
    bounded_by(OPERATION_TIMEOUT, op, fut).await
}

async fn bounded_by<T, F>(limit: Duration, op: &'static str, fut: F) -> Result<T, StoreError>
where
    F: IntoFuture<Output = mongodb::error::Result<T>>,
{
    match tokio::time::timeout(limit, fut.into_future()).await {
        Ok(result) => result.map_err(StoreError::from),
        Err(_) => {
            log::warn!("⏱️  {} exceeded {:?}", op, limit);
            Err(StoreError::Timeout(op))
        }
    }
}

impl From<mongodb::error::Error> for StoreError {
    fn from(e: mongodb::error::Error) -> Self {
        if is_duplicate_key(&e) {
            StoreError::Duplicate
        } else {
            StoreError::Backend(e.to_string())
        }
    }
}

fn is_duplicate_key(e: &mongodb::error::Error) -> bool {
    matches!(
        e.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DEFAULT_ROLE;
    use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};

    #[tokio::test]
    async fn slow_operations_surface_as_timeouts() {
        let never = std::future::pending::<mongodb::error::Result<()>>();
        let result = bounded_by(Duration::from_millis(20), "find_user", never).await;
        assert!(matches!(result, Err(StoreError::Timeout("find_user"))));
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_duplicate_email_is_rejected_by_index() {
        dotenv::dotenv().ok();
        let config = Config::from_env().unwrap();
        let db = MongoDB::connect(&config).await.unwrap();

        let email = format!("{}@example.com", ObjectId::new().to_hex());
        let user = |id| User {
            id,
            name: "Dup".into(),
            email: email.clone(),
            password: "x".into(),
            role: DEFAULT_ROLE.into(),
            bio: String::new(),
            profile_image: String::new(),
            created_at: BsonDateTime::now(),
            updated_at: BsonDateTime::now(),
        };

        db.insert_user(&user(ObjectId::new())).await.unwrap();
        let second = db.insert_user(&user(ObjectId::new())).await;
        assert!(matches!(second, Err(StoreError::Duplicate)));
    }
}
