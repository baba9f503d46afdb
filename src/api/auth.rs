use actix_web::{web, HttpResponse};

use crate::models::{AuthResponse, LoginRequest, RegisterRequest, RegisterResponse};
use crate::services::user_service;
use crate::state::AppState;
use crate::utils::AppError;

#[utoipa::path(
    post,
    path = "/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registration successful", body = RegisterResponse),
        (status = 400, description = "Missing email or password"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    state: web::Data<AppState>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    log::info!("📝 POST /register - email: {}", request.email);

    let user = user_service::register(&state, request).await.map_err(|e| {
        log::warn!("❌ Registration failed: {}", e);
        e
    })?;

    Ok(HttpResponse::Created().json(RegisterResponse {
        success: true,
        message: "Registration successful".to_string(),
        user,
    }))
}

#[utoipa::path(
    post,
    path = "/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    state: web::Data<AppState>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("🔐 POST /login - email: {}", request.email);

    match user_service::login(&state, &request).await {
        Ok(response) => {
            log::info!("✅ Login successful: {}", request.email);
            Ok(HttpResponse::Ok().json(response))
        }
        Err(e) => {
            log::warn!("❌ Login failed: {} - {}", request.email, e);
            Err(e)
        }
    }
}
