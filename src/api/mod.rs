pub mod auth;
pub mod health;
pub mod meetings;
pub mod swagger;
pub mod users;

use actix_web::{error, web, HttpRequest};

use crate::middleware::auth::AuthMiddleware;
use crate::utils::AppError;

fn json_error(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    log::debug!("Rejected JSON body: {}", err);
    AppError::InvalidRequest("invalid request body".to_string()).into()
}

fn query_error(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    log::debug!("Rejected query string: {}", err);
    AppError::InvalidRequest("invalid query parameters".to_string()).into()
}

fn path_error(err: error::PathError, _req: &HttpRequest) -> actix_web::Error {
    log::debug!("Rejected path: {}", err);
    AppError::InvalidRequest("invalid path parameters".to_string()).into()
}

/// Every route of the service. Static files and Swagger UI are mounted in `main`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::QueryConfig::default().error_handler(query_error))
        .app_data(web::PathConfig::default().error_handler(path_error))
        // Health
        .route("/", web::get().to(health::liveness))
        .route("/health", web::get().to(health::health_check))
        // Auth (public)
        .route("/register", web::post().to(auth::register))
        .route("/login", web::post().to(auth::login))
        .route("/users", web::get().to(users::list_users))
        // Protected API - Requires JWT
        .service(
            web::scope("/api")
                .wrap(AuthMiddleware)
                .route("/users/{id}", web::get().to(users::get_user))
                .route("/users/{id}", web::put().to(users::update_user))
                .route(
                    "/users/{id}/profile-image",
                    web::post().to(users::upload_profile_image),
                )
                .route("/meetings", web::post().to(meetings::create_meeting))
                .route("/meetings", web::get().to(meetings::list_meetings))
                .route("/meetings/{id}", web::get().to(meetings::get_meeting))
                .route("/meetings/{id}", web::put().to(meetings::update_meeting))
                .route("/meetings/{id}", web::delete().to(meetings::delete_meeting)),
        );
}
