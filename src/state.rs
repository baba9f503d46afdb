//! Shared application context passed to every handler through `web::Data`.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Config;
use crate::database::{MeetingStore, MongoDB, UserStore};
use crate::services::auth_service::Credentials;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub meetings: Arc<dyn MeetingStore>,
    pub credentials: Credentials,
    /// Root of the static upload tree.
    pub upload_dir: PathBuf,
}

impl AppState {
    pub fn new(db: MongoDB, config: &Config) -> Self {
        let db = Arc::new(db);
        Self {
            users: db.clone(),
            meetings: db,
            credentials: Credentials::new(config.jwt_secret.clone()),
            upload_dir: config.upload_dir.clone(),
        }
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use crate::database::memory::MemoryStore;

    pub const TEST_SECRET: &str = "test-signing-secret";

    /// State backed by [`MemoryStore`], with the minimum bcrypt cost.
    pub fn memory_state(upload_dir: PathBuf) -> (AppState, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::default());
        let state = AppState {
            users: store.clone(),
            meetings: store.clone(),
            credentials: Credentials::new(TEST_SECRET).with_hash_cost(4),
            upload_dir,
        };
        (state, store)
    }
}
