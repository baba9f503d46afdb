use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};

use crate::middleware::auth::AuthUser;
use crate::models::{
    parse_object_id, ProfileImageResponse, UpdateUserRequest, UserProfile, UserResponse,
};
use crate::services::user_service;
use crate::state::AppState;
use crate::utils::uploads::{self, MAX_IMAGE_BYTES, PROFILE_IMAGE_FIELD};
use crate::utils::AppError;

#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    responses(
        (status = 200, description = "All user profiles as a bare array", body = [UserProfile])
    )
)]
pub async fn list_users(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let users = user_service::list_users(&state).await?;

    Ok(HttpResponse::Ok().json(users))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User id (hex)")),
    responses(
        (status = 200, description = "User profile", body = UserResponse),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_user(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&path, "user")?;
    let user = user_service::get_user(&state, id).await?;

    Ok(HttpResponse::Ok().json(UserResponse {
        success: true,
        user,
    }))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User id (hex)")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated profile", body = UserResponse),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email already registered")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_user(
    state: web::Data<AppState>,
    caller: web::ReqData<AuthUser>,
    path: web::Path<String>,
    body: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&path, "user")?;
    log::info!("✏️  PUT /api/users/{} by {}", id, caller.email);

    let user = user_service::update_user(&state, id, body.into_inner()).await?;

    Ok(HttpResponse::Ok().json(UserResponse {
        success: true,
        user,
    }))
}

#[utoipa::path(
    post,
    path = "/api/users/{id}/profile-image",
    tag = "Users",
    params(("id" = String, Path, description = "User id (hex)")),
    responses(
        (status = 200, description = "Image stored", body = ProfileImageResponse),
        (status = 400, description = "No file uploaded"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn upload_profile_image(
    state: web::Data<AppState>,
    path: web::Path<String>,
    mut payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&path, "user")?;

    // nothing is written for unknown users
    user_service::get_user(&state, id).await?;

    let file = uploads::read_file_field(&mut payload, PROFILE_IMAGE_FIELD, MAX_IMAGE_BYTES).await?;
    let image_url = uploads::save_profile_image(&state.upload_dir, &file).await?;
    user_service::set_profile_image(&state, id, &image_url).await?;

    log::info!("🖼️  Profile image updated for {}: {}", id, image_url);

    Ok(HttpResponse::Ok().json(ProfileImageResponse {
        success: true,
        message: "Profile image uploaded successfully".to_string(),
        image_url,
    }))
}
