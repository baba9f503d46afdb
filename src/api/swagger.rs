use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Meeting Service API",
        version = "1.0.0",
        description = "Accounts and meeting scheduling.\n\n**Authentication:** routes under `/api` require a JWT Bearer token obtained from `/login`."
    ),
    paths(
        crate::api::health::liveness,
        crate::api::health::health_check,

        crate::api::auth::register,
        crate::api::auth::login,

        crate::api::users::list_users,
        crate::api::users::get_user,
        crate::api::users::update_user,
        crate::api::users::upload_profile_image,

        crate::api::meetings::create_meeting,
        crate::api::meetings::list_meetings,
        crate::api::meetings::get_meeting,
        crate::api::meetings::update_meeting,
        crate::api::meetings::delete_meeting,
    ),
    components(
        schemas(
            crate::api::health::HealthResponse,

            crate::models::RegisterRequest,
            crate::models::LoginRequest,
            crate::models::UpdateUserRequest,
            crate::models::UserProfile,
            crate::models::RegisterResponse,
            crate::models::AuthResponse,
            crate::models::UserResponse,
            crate::models::ProfileImageResponse,

            crate::models::CreateMeetingRequest,
            crate::models::UpdateMeetingRequest,
            crate::models::MeetingView,
            crate::models::MeetingResponse,
            crate::models::MeetingListResponse,
        )
    ),
    tags(
        (name = "Health", description = "Liveness and health."),
        (name = "Auth", description = "Registration and login."),
        (name = "Users", description = "User profiles and profile images."),
        (name = "Meetings", description = "Meetings visible to the caller as creator or participant."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token returned by /login"))
                        .build(),
                ),
            );
        }
    }
}
