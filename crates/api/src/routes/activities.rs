//! Activity routes: creation, listing, registration, and self check-in.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use std::str::FromStr;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use domain::models::activity::{
    Activity, ActivityDetail, ActivityStatus, ActivitySummary, CreateActivityRequest,
    ListActivitiesQuery, UpdateActivityRequest,
};
use domain::models::participant::ActivityParticipant;
use domain::models::user::UserRole;
use domain::services::attendance;
use persistence::entities::{ActivityStatusDb, UserEntity};
use persistence::repositories::{ActivityRepository, ParticipantRepository, UserRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::middleware::metrics::record_check_in;
use crate::response::ApiResponse;

/// Loads the caller's account row.
pub(crate) async fn load_caller(
    state: &AppState,
    user_id: Uuid,
) -> Result<UserEntity, ApiError> {
    let repo = UserRepository::new(state.pool.clone());
    repo.find_by_id(user_id)
        .await?
        .filter(|user| user.is_active)
        .ok_or_else(|| ApiError::Unauthorized("User account not found or disabled".to_string()))
}

/// Create a new activity.
///
/// POST /api/activities
///
/// Requires a leader or admin role. Leaders may only create activities for
/// their own unit.
pub async fn create_activity(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Json(request): Json<CreateActivityRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Activity>>), ApiError> {
    request.validate()?;

    if request.start_time >= request.end_time {
        return Err(ApiError::Validation(
            "Start time must be before end time".to_string(),
        ));
    }

    let caller = load_caller(&state, user_auth.user_id).await?;
    let role: UserRole = caller.role.into();

    if !role.is_elevated() {
        return Err(ApiError::Forbidden(
            "Creating activities requires a leader or admin role".to_string(),
        ));
    }

    // Leaders create for their own unit; an omitted unit defaults to it.
    let unit_id = if role.is_unit_scoped() {
        let own_unit = caller
            .unit_id
            .ok_or_else(|| ApiError::Forbidden("Leader account has no unit".to_string()))?;
        match request.unit_id {
            Some(requested) if requested != own_unit => {
                return Err(ApiError::Forbidden(
                    "Leaders may only create activities for their own unit".to_string(),
                ));
            }
            _ => Some(own_unit),
        }
    } else {
        request.unit_id
    };

    let repo = ActivityRepository::new(state.pool.clone());
    let activity = repo
        .create_activity(
            &request.title,
            &request.activity_type,
            request.start_time,
            request.end_time,
            request.location.as_deref(),
            caller.id,
            unit_id,
            request.on_time_points.unwrap_or(0),
            request.late_points.unwrap_or(0),
            request.late_threshold_minutes,
        )
        .await?;

    info!(
        activity_id = %activity.id,
        organizer_id = %caller.id,
        "Activity created"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(activity.into())),
    ))
}

/// List activities, optionally filtered by status.
///
/// GET /api/activities?status=
pub async fn list_activities(
    State(state): State<AppState>,
    _user_auth: UserAuth,
    Query(query): Query<ListActivitiesQuery>,
) -> Result<Json<ApiResponse<Vec<ActivitySummary>>>, ApiError> {
    let status = query
        .status
        .as_deref()
        .map(ActivityStatus::from_str)
        .transpose()
        .map_err(ApiError::Validation)?
        .map(ActivityStatusDb::from);

    let repo = ActivityRepository::new(state.pool.clone());
    let activities = repo.list(status).await?;

    let summaries: Vec<ActivitySummary> = activities
        .into_iter()
        .map(|entity| {
            let activity: Activity = entity.into();
            ActivitySummary::from(&activity)
        })
        .collect();

    Ok(Json(ApiResponse::ok(summaries)))
}

/// Get activity details with the caller's own participation, if any.
///
/// GET /api/activities/:activity_id
pub async fn get_activity(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(activity_id): Path<Uuid>,
) -> Result<Json<ApiResponse<ActivityDetail>>, ApiError> {
    let activity_repo = ActivityRepository::new(state.pool.clone());
    let activity = activity_repo
        .find_by_id(activity_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Activity not found".to_string()))?;

    let participant_count = activity_repo.count_participants(activity_id).await?;

    let participant_repo = ParticipantRepository::new(state.pool.clone());
    let my_participation = participant_repo
        .find_by_activity_and_user(activity_id, user_auth.user_id)
        .await?
        .map(ActivityParticipant::from);

    Ok(Json(ApiResponse::ok(ActivityDetail {
        activity: activity.into(),
        participant_count,
        my_participation,
    })))
}

/// Update an activity.
///
/// PUT /api/activities/:activity_id
///
/// Same access rule as creation, scoped to the activity's unit.
pub async fn update_activity(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(activity_id): Path<Uuid>,
    Json(request): Json<UpdateActivityRequest>,
) -> Result<Json<ApiResponse<Activity>>, ApiError> {
    request.validate()?;

    let status = request
        .status
        .as_deref()
        .map(ActivityStatus::from_str)
        .transpose()
        .map_err(ApiError::Validation)?;

    let repo = ActivityRepository::new(state.pool.clone());
    let activity: Activity = repo
        .find_by_id(activity_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Activity not found".to_string()))?
        .into();

    let caller = load_caller(&state, user_auth.user_id).await?;
    crate::services::access::ensure_can_administer_activity(
        caller.role.into(),
        caller.unit_id,
        &activity,
    )?;

    let updated = repo
        .update_activity(
            activity_id,
            request.title.as_deref(),
            request.location.as_deref(),
            status.map(ActivityStatusDb::from),
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Activity not found".to_string()))?;

    info!(activity_id = %activity_id, user_id = %caller.id, "Activity updated");

    Ok(Json(ApiResponse::ok(updated.into())))
}

/// Register the caller for an activity.
///
/// POST /api/activities/:activity_id/register
pub async fn register_for_activity(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(activity_id): Path<Uuid>,
) -> Result<(StatusCode, Json<ApiResponse<ActivityParticipant>>), ApiError> {
    let activity_repo = ActivityRepository::new(state.pool.clone());
    let activity: Activity = activity_repo
        .find_by_id(activity_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Activity not found".to_string()))?
        .into();

    if !activity.status.accepts_registrations() {
        return Err(ApiError::InvalidState(
            "Activity is not open for registration".to_string(),
        ));
    }

    let participant_repo = ParticipantRepository::new(state.pool.clone());
    let participant = match participant_repo.register(activity_id, user_auth.user_id).await {
        Err(sqlx::Error::Database(db_err)) if db_err.code().as_deref() == Some("23505") => {
            return Err(ApiError::Conflict(
                "Already registered for this activity".to_string(),
            ));
        }
        other => other?,
    };

    info!(
        activity_id = %activity_id,
        user_id = %user_auth.user_id,
        "User registered for activity"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(participant.into())),
    ))
}

/// Self check-in for the authenticated caller (QR/GPS flow).
///
/// POST /api/activities/:activity_id/checkin
///
/// Awards points through the shared check-in path, honoring the activity's
/// configured late threshold.
pub async fn self_check_in(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(activity_id): Path<Uuid>,
) -> Result<Json<ApiResponse<ActivityParticipant>>, ApiError> {
    let activity_repo = ActivityRepository::new(state.pool.clone());
    let activity: Activity = activity_repo
        .find_by_id(activity_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Activity not found".to_string()))?
        .into();

    let participant_repo = ParticipantRepository::new(state.pool.clone());
    let participant = participant_repo
        .find_by_activity_and_user(activity_id, user_auth.user_id)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound("You are not registered for this activity".to_string())
        })?;

    if participant.check_in_time.is_some() {
        return Err(ApiError::InvalidState("Already checked in".to_string()));
    }

    let now = Utc::now();
    let timing = attendance::classify_check_in(now, &activity);
    let points = attendance::award_points(timing, &activity);
    let reason = attendance::award_reason(timing, &activity.title);

    let updated = participant_repo
        .check_in(participant.id, now, points, &reason, activity.id)
        .await?
        .ok_or_else(|| ApiError::InvalidState("Already checked in".to_string()))?;

    record_check_in(timing == attendance::CheckInTiming::Late);

    info!(
        activity_id = %activity_id,
        user_id = %user_auth.user_id,
        points = points,
        late = timing == attendance::CheckInTiming::Late,
        "Self check-in"
    );

    Ok(Json(ApiResponse::ok(updated.into())))
}
