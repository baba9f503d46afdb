use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};

use crate::models::{
    AuthResponse, LoginRequest, RegisterRequest, UpdateUserRequest, User, UserChanges,
    UserProfile, DEFAULT_ROLE,
};
use crate::state::AppState;
use crate::utils::AppError;

/// Single message for unknown email and wrong password alike.
pub const INVALID_CREDENTIALS: &str = "invalid email or password";

// User registration
pub async fn register(state: &AppState, request: RegisterRequest) -> Result<UserProfile, AppError> {
    if request.email.trim().is_empty() {
        return Err(AppError::InvalidRequest("email is required".to_string()));
    }
    if request.password.is_empty() {
        return Err(AppError::InvalidRequest("password is required".to_string()));
    }

    let password = state.credentials.hash_password(&request.password).await?;
    let now = BsonDateTime::now();

    let user = User {
        id: ObjectId::new(),
        name: request.name,
        email: request.email,
        password,
        role: request
            .role
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ROLE.to_string()),
        bio: request.bio.unwrap_or_default(),
        profile_image: String::new(),
        created_at: now,
        updated_at: now,
    };

    // the unique index on email is the only uniqueness check
    state.users.insert_user(&user).await?;

    log::info!("✅ User registered successfully: {}", user.email);

    Ok(UserProfile::from(user))
}

// User login
pub async fn login(state: &AppState, request: &LoginRequest) -> Result<AuthResponse, AppError> {
    let invalid = || AppError::Unauthorized(INVALID_CREDENTIALS.to_string());

    let Some(user) = state.users.find_user_by_email(&request.email).await? else {
        // same bcrypt work as a real mismatch, so timing does not reveal the account
        state.credentials.verify_without_user(&request.password).await;
        return Err(invalid());
    };

    if !state
        .credentials
        .verify_password(&request.password, &user.password)
        .await
    {
        return Err(invalid());
    }

    let token = state.credentials.issue_token(&user.id, &user.email)?;

    Ok(AuthResponse {
        success: true,
        message: "Login successful".to_string(),
        token,
        user: UserProfile::from(user),
    })
}

pub async fn list_users(state: &AppState) -> Result<Vec<UserProfile>, AppError> {
    let users = state.users.list_users().await?;
    Ok(users.into_iter().map(UserProfile::from).collect())
}

pub async fn get_user(state: &AppState, id: ObjectId) -> Result<UserProfile, AppError> {
    state
        .users
        .find_user(id)
        .await?
        .map(UserProfile::from)
        .ok_or_else(|| AppError::NotFound("user not found".to_string()))
}

pub async fn update_user(
    state: &AppState,
    id: ObjectId,
    request: UpdateUserRequest,
) -> Result<UserProfile, AppError> {
    if request.email.as_deref().is_some_and(|e| e.trim().is_empty()) {
        return Err(AppError::InvalidRequest("email must not be empty".to_string()));
    }

    let changes = UserChanges::from_request(request, BsonDateTime::now());

    let matched = state.users.update_user(id, &changes).await?;
    if matched == 0 {
        return Err(AppError::NotFound("user not found".to_string()));
    }

    get_user(state, id).await
}

pub async fn set_profile_image(state: &AppState, id: ObjectId, url: &str) -> Result<(), AppError> {
    let changes = UserChanges::profile_image(url, BsonDateTime::now());

    let matched = state.users.update_user(id, &changes).await?;
    if matched == 0 {
        return Err(AppError::NotFound("user not found".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::testing::memory_state;
    use std::path::PathBuf;

    fn registration(email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: "Budi".into(),
            email: email.into(),
            password: password.into(),
            role: None,
            bio: None,
        }
    }

    #[tokio::test]
    async fn register_defaults_role_and_hashes_password() {
        let (state, _) = memory_state(PathBuf::from("unused"));
        let profile = register(&state, registration("budi@example.com", "rahasia"))
            .await
            .unwrap();
        assert_eq!(profile.role, "User");

        let id = ObjectId::parse_str(&profile.id).unwrap();
        let stored = state.users.find_user(id).await.unwrap().unwrap();
        assert_ne!(stored.password, "rahasia");
        assert!(stored.password.starts_with("$2"));
    }

    #[tokio::test]
    async fn explicit_role_is_kept() {
        let (state, _) = memory_state(PathBuf::from("unused"));
        let mut request = registration("admin@example.com", "pw");
        request.role = Some("Admin".into());
        assert_eq!(register(&state, request).await.unwrap().role, "Admin");
    }

    #[tokio::test]
    async fn duplicate_email_conflicts_without_inserting() {
        let (state, store) = memory_state(PathBuf::from("unused"));
        register(&state, registration("dup@example.com", "one")).await.unwrap();

        let second = register(&state, registration("dup@example.com", "two")).await;
        assert!(matches!(second, Err(AppError::Conflict(_))));
        assert_eq!(store.user_count(), 1);
    }

    #[tokio::test]
    async fn missing_email_or_password_is_rejected() {
        let (state, _) = memory_state(PathBuf::from("unused"));
        assert!(matches!(
            register(&state, registration("", "pw")).await,
            Err(AppError::InvalidRequest(_))
        ));
        assert!(matches!(
            register(&state, registration("a@example.com", "")).await,
            Err(AppError::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn login_failures_are_indistinguishable() {
        let (state, _) = memory_state(PathBuf::from("unused"));
        register(&state, registration("sari@example.com", "correct")).await.unwrap();

        let wrong_password = login(
            &state,
            &LoginRequest {
                email: "sari@example.com".into(),
                password: "wrong".into(),
            },
        )
        .await
        .unwrap_err();
        let unknown_email = login(
            &state,
            &LoginRequest {
                email: "nobody@example.com".into(),
                password: "correct".into(),
            },
        )
        .await
        .unwrap_err();

        assert_eq!(wrong_password.public_message(), INVALID_CREDENTIALS);
        assert_eq!(unknown_email.public_message(), INVALID_CREDENTIALS);
    }

    #[tokio::test]
    async fn unknown_email_still_runs_a_password_check() {
        let (state, _) = memory_state(PathBuf::from("unused"));
        assert!(!state.credentials.dummy_digest_ready());

        let result = login(
            &state,
            &LoginRequest {
                email: "ghost@example.com".into(),
                password: "guess".into(),
            },
        )
        .await;

        assert!(matches!(result, Err(AppError::Unauthorized(_))));
        assert!(state.credentials.dummy_digest_ready());
    }

    #[tokio::test]
    async fn login_issues_a_token_for_the_user() {
        let (state, _) = memory_state(PathBuf::from("unused"));
        let profile = register(&state, registration("tono@example.com", "pw")).await.unwrap();

        let response = login(
            &state,
            &LoginRequest {
                email: "tono@example.com".into(),
                password: "pw".into(),
            },
        )
        .await
        .unwrap();

        let claims = state.credentials.verify_token(&response.token).unwrap();
        assert_eq!(claims.id, profile.id);
        assert_eq!(response.user.email, "tono@example.com");
    }

    #[tokio::test]
    async fn update_changes_only_supplied_fields() {
        let (state, _) = memory_state(PathBuf::from("unused"));
        let profile = register(&state, registration("dewi@example.com", "pw")).await.unwrap();
        let id = ObjectId::parse_str(&profile.id).unwrap();
        let before = state.users.find_user(id).await.unwrap().unwrap();

        let request: UpdateUserRequest =
            serde_json::from_str(r#"{"bio":"Product lead","password":"new-password"}"#).unwrap();
        let updated = update_user(&state, id, request).await.unwrap();

        assert_eq!(updated.bio, "Product lead");
        assert_eq!(updated.name, "Budi");
        let after = state.users.find_user(id).await.unwrap().unwrap();
        assert_eq!(after.password, before.password);
        assert!(after.updated_at >= before.updated_at);
    }

    #[tokio::test]
    async fn update_unknown_user_is_not_found() {
        let (state, _) = memory_state(PathBuf::from("unused"));
        let result = update_user(&state, ObjectId::new(), UpdateUserRequest::default()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn update_cannot_blank_the_email() {
        let (state, _) = memory_state(PathBuf::from("unused"));
        let profile = register(&state, registration("keep@example.com", "pw")).await.unwrap();
        let id = ObjectId::parse_str(&profile.id).unwrap();

        let request = UpdateUserRequest {
            email: Some("   ".into()),
            ..Default::default()
        };
        assert!(matches!(
            update_user(&state, id, request).await,
            Err(AppError::InvalidRequest(_))
        ));
        let stored = state.users.find_user(id).await.unwrap().unwrap();
        assert_eq!(stored.email, "keep@example.com");
    }

    #[tokio::test]
    async fn changing_email_to_a_taken_one_conflicts() {
        let (state, _) = memory_state(PathBuf::from("unused"));
        register(&state, registration("first@example.com", "pw")).await.unwrap();
        let second = register(&state, registration("second@example.com", "pw")).await.unwrap();

        let request = UpdateUserRequest {
            email: Some("first@example.com".into()),
            ..Default::default()
        };
        let result = update_user(&state, ObjectId::parse_str(&second.id).unwrap(), request).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }
}
