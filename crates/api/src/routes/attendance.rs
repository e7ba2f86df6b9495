//! Attendance routes: the attendance report, self-reported absences, the
//! admin status mutator, and batch check-in.
//!
//! All point-awarding paths go through
//! `ParticipantRepository::check_in`, so a first check-in always updates the
//! participation row, the member's points counter, and the points ledger
//! together, exactly once.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use std::str::FromStr;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use domain::models::activity::{Activity, ActivitySummary};
use domain::models::participant::{
    ActivityParticipant, AttendanceQuery, AttendanceReport, BatchCheckInOutcome,
    BatchCheckInRequest, ParticipantStatus, ParticipantWithUser, ReportAbsenceRequest,
    UpdateAttendanceRequest,
};
use domain::models::user::UserPublic;
use domain::services::attendance;
use persistence::entities::{ParticipantEntity, ParticipantStatusDb};
use persistence::repositories::{ActivityRepository, ParticipantRepository, UserRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::middleware::metrics::record_check_in;
use crate::response::ApiResponse;
use crate::routes::activities::load_caller;
use crate::services::access::ensure_can_administer_activity;

async fn load_activity(state: &AppState, activity_id: Uuid) -> Result<Activity, ApiError> {
    let repo = ActivityRepository::new(state.pool.clone());
    repo.find_by_id(activity_id)
        .await?
        .map(Activity::from)
        .ok_or_else(|| ApiError::NotFound("Activity not found".to_string()))
}

/// Attendance report for an activity: participants and statistics.
///
/// GET /api/activities/:activity_id/attendance?status=&search=
///
/// Requires a leader or admin role; leaders only for their own unit's
/// activities. The status filter is applied in the query; the free-text
/// search is applied in memory afterwards and never affects the statistics.
pub async fn get_attendance(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(activity_id): Path<Uuid>,
    Query(query): Query<AttendanceQuery>,
) -> Result<Json<ApiResponse<AttendanceReport>>, ApiError> {
    let activity = load_activity(&state, activity_id).await?;

    let caller = load_caller(&state, user_auth.user_id).await?;
    ensure_can_administer_activity(caller.role.into(), caller.unit_id, &activity)?;

    let status_filter = query
        .status
        .as_deref()
        .map(ParticipantStatus::from_str)
        .transpose()
        .map_err(ApiError::Validation)?;

    let repo = ParticipantRepository::new(state.pool.clone());
    let participants: Vec<ParticipantWithUser> = repo
        .list_with_users(activity_id, status_filter.map(ParticipantStatusDb::from))
        .await?
        .into_iter()
        .map(ParticipantWithUser::from)
        .collect();

    // Statistics cover the status-filtered set, before search filtering.
    let stats = attendance::compute_stats(&participants, &activity);

    let participants = match query.search.as_deref().map(str::trim) {
        Some(term) if !term.is_empty() => participants
            .into_iter()
            .filter(|participant| attendance::matches_search(participant, term))
            .collect(),
        _ => participants,
    };

    info!(
        activity_id = %activity_id,
        user_id = %caller.id,
        participant_count = participants.len(),
        "Attendance report retrieved"
    );

    Ok(Json(ApiResponse::ok(AttendanceReport {
        activity: ActivitySummary::from(&activity),
        participants,
        stats,
    })))
}

/// Self-report an absence for the authenticated caller.
///
/// POST /api/activities/:activity_id/report-absent
///
/// Preconditions are checked in order, first failure wins: non-blank
/// reason, activity exists, caller is registered, not checked in, not
/// already absent.
pub async fn report_absent(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(activity_id): Path<Uuid>,
    Json(request): Json<ReportAbsenceRequest>,
) -> Result<Json<ApiResponse<ActivityParticipant>>, ApiError> {
    request.validate()?;
    let reason = request.reason.trim();

    let _activity = load_activity(&state, activity_id).await?;

    let repo = ParticipantRepository::new(state.pool.clone());
    let participant = repo
        .find_by_activity_and_user(activity_id, user_auth.user_id)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound("You are not registered for this activity".to_string())
        })?;

    attendance::validate_absence_report(participant.status.into())
        .map_err(|e| ApiError::InvalidState(e.to_string()))?;

    let updated = repo
        .report_absence(participant.id, reason)
        .await?
        .ok_or_else(|| ApiError::NotFound("Participant not found".to_string()))?;

    info!(
        activity_id = %activity_id,
        user_id = %user_auth.user_id,
        "Absence self-reported"
    );

    Ok(Json(ApiResponse::ok(updated.into())))
}

/// Set a participant's attendance status.
///
/// PUT /api/activities/:activity_id/attendance/:participant_id
///
/// Requires a leader or admin role; leaders only for their own unit's
/// activities. The first transition to CHECKED_IN awards points (on-time or
/// late against the activity's threshold); repeat transitions never
/// re-award.
pub async fn update_attendance(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path((activity_id, participant_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<UpdateAttendanceRequest>,
) -> Result<Json<ApiResponse<ParticipantWithUser>>, ApiError> {
    let desired =
        ParticipantStatus::from_str(&request.status).map_err(ApiError::Validation)?;

    let activity = load_activity(&state, activity_id).await?;

    let caller = load_caller(&state, user_auth.user_id).await?;
    ensure_can_administer_activity(caller.role.into(), caller.unit_id, &activity)?;

    let repo = ParticipantRepository::new(state.pool.clone());
    let participant = repo
        .find_by_id(participant_id)
        .await?
        .filter(|participant| participant.activity_id == activity_id)
        .ok_or_else(|| {
            ApiError::NotFound("Participant not found for this activity".to_string())
        })?;

    let updated = if desired == ParticipantStatus::CheckedIn
        && participant.check_in_time.is_none()
    {
        // First check-in: award points atomically with the status change.
        let effective_time = request.check_in_time.unwrap_or_else(Utc::now);
        let timing = attendance::classify_check_in(effective_time, &activity);
        let points = attendance::award_points(timing, &activity);
        let reason = attendance::award_reason(timing, &activity.title);

        match repo
            .check_in(participant.id, effective_time, points, &reason, activity.id)
            .await?
        {
            Some(updated) => {
                record_check_in(timing == attendance::CheckInTiming::Late);
                info!(
                    activity_id = %activity_id,
                    participant_id = %participant_id,
                    user_id = %caller.id,
                    points = points,
                    late = timing == attendance::CheckInTiming::Late,
                    "Participant checked in"
                );
                updated
            }
            // Lost a race against a concurrent check-in; the original award
            // stands and only the status write remains to do.
            None => set_status(&repo, &participant, desired, None).await?,
        }
    } else {
        let absent_reason = request
            .absent_reason
            .as_deref()
            .filter(|_| desired == ParticipantStatus::Absent);
        set_status(&repo, &participant, desired, absent_reason).await?
    };

    let user = UserRepository::new(state.pool.clone())
        .find_by_id(updated.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Participant user not found".to_string()))?;

    let updated: ActivityParticipant = updated.into();
    Ok(Json(ApiResponse::ok(ParticipantWithUser {
        id: updated.id,
        activity_id: updated.activity_id,
        status: updated.status,
        check_in_time: updated.check_in_time,
        points_earned: updated.points_earned,
        absent_reason: updated.absent_reason,
        registered_at: updated.registered_at,
        user: UserPublic::from(&user),
    })))
}

async fn set_status(
    repo: &ParticipantRepository,
    participant: &ParticipantEntity,
    status: ParticipantStatus,
    absent_reason: Option<&str>,
) -> Result<ParticipantEntity, ApiError> {
    repo.set_status(participant.id, status.into(), absent_reason)
        .await?
        .ok_or_else(|| ApiError::NotFound("Participant not found".to_string()))
}

/// Check in a list of members in one call.
///
/// POST /api/activities/:activity_id/batch-checkin
///
/// Requires a leader or admin role; leaders only for their own unit's
/// activities. Members are processed sequentially and independently: one
/// failure never aborts the batch, and the outcome list preserves input
/// order.
pub async fn batch_check_in(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(activity_id): Path<Uuid>,
    Json(request): Json<BatchCheckInRequest>,
) -> Result<Json<ApiResponse<Vec<BatchCheckInOutcome>>>, ApiError> {
    if request.user_ids.is_empty() {
        return Err(ApiError::Validation(
            "userIds must be a non-empty array".to_string(),
        ));
    }

    let activity = load_activity(&state, activity_id).await?;

    let caller = load_caller(&state, user_auth.user_id).await?;
    ensure_can_administer_activity(caller.role.into(), caller.unit_id, &activity)?;

    let repo = ParticipantRepository::new(state.pool.clone());
    let mut outcomes = Vec::with_capacity(request.user_ids.len());

    for user_id in request.user_ids {
        let outcome = check_in_one(&repo, &activity, user_id).await;
        outcomes.push(outcome);
    }

    let succeeded = outcomes.iter().filter(|outcome| outcome.success).count();
    info!(
        activity_id = %activity_id,
        user_id = %caller.id,
        total = outcomes.len(),
        succeeded = succeeded,
        "Batch check-in completed"
    );

    Ok(Json(ApiResponse::ok(outcomes)))
}

/// Process one member of a batch check-in; never propagates errors.
async fn check_in_one(
    repo: &ParticipantRepository,
    activity: &Activity,
    user_id: Uuid,
) -> BatchCheckInOutcome {
    let participant = match repo.find_by_activity_and_user(activity.id, user_id).await {
        Ok(Some(participant)) => participant,
        Ok(None) => {
            return BatchCheckInOutcome::failed(user_id, "Not found or already checked in");
        }
        Err(e) => return BatchCheckInOutcome::failed(user_id, e.to_string()),
    };

    if participant.status == ParticipantStatusDb::CheckedIn {
        return BatchCheckInOutcome::failed(user_id, "Not found or already checked in");
    }

    if participant.check_in_time.is_some() {
        // Previously checked in and later moved to another status: restore
        // the status without a second award.
        return match repo
            .set_status(participant.id, ParticipantStatusDb::CheckedIn, None)
            .await
        {
            Ok(Some(_)) => BatchCheckInOutcome::ok(user_id),
            Ok(None) => BatchCheckInOutcome::failed(user_id, "Not found or already checked in"),
            Err(e) => BatchCheckInOutcome::failed(user_id, e.to_string()),
        };
    }

    let now = Utc::now();
    let timing = attendance::classify_check_in(now, activity);
    let points = attendance::award_points(timing, activity);
    let reason = attendance::award_reason(timing, &activity.title);

    match repo
        .check_in(participant.id, now, points, &reason, activity.id)
        .await
    {
        Ok(Some(_)) => {
            record_check_in(timing == attendance::CheckInTiming::Late);
            BatchCheckInOutcome::ok(user_id)
        }
        Ok(None) => BatchCheckInOutcome::failed(user_id, "Not found or already checked in"),
        Err(e) => BatchCheckInOutcome::failed(user_id, e.to_string()),
    }
}
