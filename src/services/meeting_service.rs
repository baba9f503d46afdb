use chrono::{Duration, Local, NaiveDate, TimeZone, Utc};
use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};

use crate::database::TimeWindow;
use crate::models::{
    parse_object_id, to_bson, CreateMeetingRequest, Meeting, MeetingChanges, MeetingView,
    UpdateMeetingRequest, DEFAULT_DURATION_MINUTES,
};
use crate::state::AppState;
use crate::utils::AppError;

fn not_found() -> AppError {
    AppError::NotFound("meeting not found".to_string())
}

fn parse_participants(raw: &[String]) -> Result<Vec<ObjectId>, AppError> {
    raw.iter().map(|id| parse_object_id(id, "participant")).collect()
}

pub async fn create_meeting(
    state: &AppState,
    creator: ObjectId,
    request: CreateMeetingRequest,
) -> Result<MeetingView, AppError> {
    if request.title.trim().is_empty() {
        return Err(AppError::InvalidRequest("meeting title is required".to_string()));
    }
    let start_time = request
        .start_time
        .filter(|t| t.timestamp_millis() != 0)
        .ok_or_else(|| AppError::InvalidRequest("meeting start time is required".to_string()))?;

    let duration = if request.duration <= 0 {
        DEFAULT_DURATION_MINUTES
    } else {
        request.duration
    };

    let now = BsonDateTime::now();
    let mut meeting = Meeting {
        id: ObjectId::new(),
        title: request.title,
        description: request.description,
        start_time: to_bson(start_time),
        duration,
        created_by: creator,
        participants: parse_participants(&request.participants)?,
        emotion_tracking: request.emotion_tracking,
        created_at: now,
        updated_at: now,
    };

    meeting.id = state.meetings.insert_meeting(&meeting).await?;
    log::info!("📅 Meeting {} created by {}", meeting.id, creator);

    Ok(MeetingView::from(meeting))
}

/// Meetings the user created or participates in, optionally limited to one
/// local calendar day (`YYYY-MM-DD`).
pub async fn list_meetings(
    state: &AppState,
    user: ObjectId,
    date: Option<&str>,
) -> Result<Vec<MeetingView>, AppError> {
    let window = date
        .filter(|d| !d.trim().is_empty())
        .map(local_day_window)
        .transpose()?;

    let meetings = state.meetings.list_meetings_for(user, window).await?;
    Ok(meetings.into_iter().map(MeetingView::from).collect())
}

pub async fn get_meeting(
    state: &AppState,
    user: ObjectId,
    id: ObjectId,
) -> Result<MeetingView, AppError> {
    let meeting = state.meetings.find_meeting(id).await?.ok_or_else(not_found)?;

    if !meeting.is_visible_to(&user) {
        return Err(AppError::Forbidden("access denied".to_string()));
    }
    Ok(MeetingView::from(meeting))
}

pub async fn update_meeting(
    state: &AppState,
    user: ObjectId,
    id: ObjectId,
    request: UpdateMeetingRequest,
) -> Result<MeetingView, AppError> {
    load_owned(state, user, id, "update").await?;

    let changes = MeetingChanges {
        title: request.title.filter(|t| !t.trim().is_empty()),
        description: request.description.filter(|d| !d.is_empty()),
        start_time: request
            .start_time
            .filter(|t| t.timestamp_millis() != 0)
            .map(to_bson),
        duration: request.duration.filter(|d| *d > 0),
        participants: request
            .participants
            .as_deref()
            .map(parse_participants)
            .transpose()?,
        emotion_tracking: request.emotion_tracking,
        updated_at: BsonDateTime::now(),
    };

    let matched = state.meetings.update_meeting(id, &changes).await?;
    if matched == 0 {
        return Err(not_found());
    }

    let meeting = state.meetings.find_meeting(id).await?.ok_or_else(not_found)?;
    Ok(MeetingView::from(meeting))
}

pub async fn delete_meeting(state: &AppState, user: ObjectId, id: ObjectId) -> Result<(), AppError> {
    load_owned(state, user, id, "delete").await?;

    let deleted = state.meetings.delete_meeting(id).await?;
    if deleted == 0 {
        return Err(not_found());
    }

    log::info!("🗑️  Meeting {} deleted by {}", id, user);
    Ok(())
}

/// Existence and ownership check run before an update body is looked at.
pub async fn authorize_update(
    state: &AppState,
    user: ObjectId,
    id: ObjectId,
) -> Result<(), AppError> {
    load_owned(state, user, id, "update").await.map(|_| ())
}

/// Absent -> 404, present but not created by `user` -> 403.
async fn load_owned(
    state: &AppState,
    user: ObjectId,
    id: ObjectId,
    action: &str,
) -> Result<Meeting, AppError> {
    let meeting = state.meetings.find_meeting(id).await?.ok_or_else(not_found)?;

    if !meeting.is_creator(&user) {
        return Err(AppError::Forbidden(format!(
            "only the meeting creator may {} it",
            action
        )));
    }
    Ok(meeting)
}

/// `[local midnight of day, local midnight of the next day)`.
pub fn local_day_window(raw: &str) -> Result<TimeWindow, AppError> {
    let day = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::InvalidRequest("date must be formatted as YYYY-MM-DD".to_string()))?;
    let next = day
        .succ_opt()
        .ok_or_else(|| AppError::InvalidRequest("date out of range".to_string()))?;

    Ok(TimeWindow {
        start: to_bson(local_midnight(day)?),
        end: to_bson(local_midnight(next)?),
    })
}

fn local_midnight(day: NaiveDate) -> Result<chrono::DateTime<Utc>, AppError> {
    let midnight = day
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| AppError::InvalidRequest("date out of range".to_string()))?;

    // Some zones skip midnight on DST transitions; the day then starts an hour later.
    Local
        .from_local_datetime(&midnight)
        .earliest()
        .or_else(|| Local.from_local_datetime(&(midnight + Duration::hours(1))).earliest())
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| AppError::InvalidRequest("date has no local midnight".to_string()))
}
