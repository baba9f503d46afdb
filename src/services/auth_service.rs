use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::utils::AppError;

/// bcrypt cost for stored passwords.
pub const PASSWORD_HASH_COST: u32 = 14;

pub const TOKEN_TTL_HOURS: i64 = 24;

const DUMMY_PASSWORD: &str = "no-such-account";

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub id: String, // user ObjectId (hex)
    pub email: String,
    pub exp: usize, // expiration (unix seconds)
}

/// Password hashing and session tokens, built once from configuration.
#[derive(Clone)]
pub struct Credentials {
    secret: String,
    hash_cost: u32,
    /// Digest checked when a login names no account, hashed on first use.
    dummy_digest: Arc<OnceCell<String>>,
}

impl Credentials {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            hash_cost: PASSWORD_HASH_COST,
            dummy_digest: Arc::new(OnceCell::new()),
        }
    }

    #[cfg(test)]
    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    /// bcrypt runs on the blocking pool.
    pub async fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let password = password.to_string();
        let cost = self.hash_cost;

        tokio::task::spawn_blocking(move || hash(password, cost))
            .await
            .map_err(|e| AppError::Internal(format!("Hashing task failed: {}", e)))?
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
    }

    /// Mismatches and malformed digests both yield `false`.
    pub async fn verify_password(&self, password: &str, digest: &str) -> bool {
        let password = password.to_string();
        let digest = digest.to_string();

        match tokio::task::spawn_blocking(move || verify(password, &digest)).await {
            Ok(Ok(valid)) => valid,
            Ok(Err(e)) => {
                log::warn!("⚠️  Password verification error: {}", e);
                false
            }
            Err(e) => {
                log::error!("❌ Verification task failed: {}", e);
                false
            }
        }
    }

    /// Spends the cost of one bcrypt verification without an account. Always `false`.
    pub async fn verify_without_user(&self, password: &str) -> bool {
        let digest = self
            .dummy_digest
            .get_or_try_init(|| self.hash_password(DUMMY_PASSWORD))
            .await;

        match digest {
            Ok(digest) => {
                self.verify_password(password, digest).await;
            }
            Err(e) => log::warn!("⚠️  Dummy digest unavailable: {}", e),
        }
        false
    }

    #[cfg(test)]
    pub fn dummy_digest_ready(&self) -> bool {
        self.dummy_digest.initialized()
    }

    // Generate JWT token
    pub fn issue_token(&self, user_id: &ObjectId, email: &str) -> Result<String, AppError> {
        let exp = (Utc::now() + Duration::hours(TOKEN_TTL_HOURS)).timestamp() as usize;

        let claims = Claims {
            id: user_id.to_hex(),
            email: email.to_string(),
            exp,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Only the HMAC family is accepted; `exp` is checked without leeway.
    pub fn verify_token(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.leeway = 0;

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| AppError::Unauthorized(format!("invalid token: {}", e)))
    }
}
