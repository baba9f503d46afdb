use actix_web::{web, HttpResponse};

use crate::middleware::auth::AuthUser;
use crate::models::{
    parse_object_id, CreateMeetingRequest, MeetingListQuery, MeetingListResponse,
    MeetingResponse, UpdateMeetingRequest,
};
use crate::services::meeting_service;
use crate::state::AppState;
use crate::utils::AppError;

/// POST /api/meetings - Cria nova reunião
#[utoipa::path(
    post,
    path = "/api/meetings",
    tag = "Meetings",
    request_body = CreateMeetingRequest,
    responses(
        (status = 201, description = "Meeting created", body = MeetingResponse),
        (status = 400, description = "Missing title or start time")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_meeting(
    state: web::Data<AppState>,
    user: web::ReqData<AuthUser>,
    body: web::Json<CreateMeetingRequest>,
) -> Result<HttpResponse, AppError> {
    let meeting = meeting_service::create_meeting(&state, user.id, body.into_inner()).await?;

    Ok(HttpResponse::Created().json(MeetingResponse {
        success: true,
        message: Some("Meeting created".to_string()),
        meeting,
    }))
}

/// GET /api/meetings - Reuniões criadas pelo usuário ou em que participa
#[utoipa::path(
    get,
    path = "/api/meetings",
    tag = "Meetings",
    params(MeetingListQuery),
    responses(
        (status = 200, description = "Visible meetings", body = MeetingListResponse),
        (status = 400, description = "Malformed date")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_meetings(
    state: web::Data<AppState>,
    user: web::ReqData<AuthUser>,
    query: web::Query<MeetingListQuery>,
) -> Result<HttpResponse, AppError> {
    let meetings =
        meeting_service::list_meetings(&state, user.id, query.date.as_deref()).await?;

    Ok(HttpResponse::Ok().json(MeetingListResponse {
        success: true,
        total: meetings.len(),
        meetings,
    }))
}

#[utoipa::path(
    get,
    path = "/api/meetings/{id}",
    tag = "Meetings",
    params(("id" = String, Path, description = "Meeting id (hex)")),
    responses(
        (status = 200, description = "Meeting", body = MeetingResponse),
        (status = 403, description = "Neither creator nor participant"),
        (status = 404, description = "Meeting not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_meeting(
    state: web::Data<AppState>,
    user: web::ReqData<AuthUser>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&path, "meeting")?;
    let meeting = meeting_service::get_meeting(&state, user.id, id).await?;

    Ok(HttpResponse::Ok().json(MeetingResponse {
        success: true,
        message: None,
        meeting,
    }))
}

#[utoipa::path(
    put,
    path = "/api/meetings/{id}",
    tag = "Meetings",
    params(("id" = String, Path, description = "Meeting id (hex)")),
    request_body = UpdateMeetingRequest,
    responses(
        (status = 200, description = "Meeting updated", body = MeetingResponse),
        (status = 400, description = "Malformed body from the creator"),
        (status = 403, description = "Not the creator"),
        (status = 404, description = "Meeting not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_meeting(
    state: web::Data<AppState>,
    user: web::ReqData<AuthUser>,
    path: web::Path<String>,
    body: Result<web::Json<UpdateMeetingRequest>, actix_web::Error>,
) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&path, "meeting")?;

    // 404 and 403 win over a malformed body
    meeting_service::authorize_update(&state, user.id, id).await?;
    let body = body.map_err(|_| AppError::InvalidRequest("invalid request body".to_string()))?;

    let meeting =
        meeting_service::update_meeting(&state, user.id, id, body.into_inner()).await?;

    Ok(HttpResponse::Ok().json(MeetingResponse {
        success: true,
        message: Some("Meeting updated".to_string()),
        meeting,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/meetings/{id}",
    tag = "Meetings",
    params(("id" = String, Path, description = "Meeting id (hex)")),
    responses(
        (status = 200, description = "Meeting deleted"),
        (status = 403, description = "Not the creator"),
        (status = 404, description = "Meeting not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_meeting(
    state: web::Data<AppState>,
    user: web::ReqData<AuthUser>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&path, "meeting")?;
    meeting_service::delete_meeting(&state, user.id, id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Meeting deleted"
    })))
}
