//! Attendance business logic.
//!
//! Lateness policy lives here and nowhere else: every entry point that
//! classifies a check-in (attendance stats, the admin status mutator, self
//! check-in, batch check-in) calls [`classify_check_in`], which honors the
//! activity's configured threshold and falls back to
//! [`DEFAULT_LATE_THRESHOLD_MINUTES`].

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::models::activity::Activity;
use crate::models::participant::{AttendanceStats, ParticipantStatus, ParticipantWithUser};

/// Minutes after the activity start before a check-in counts as late, when
/// the activity does not configure its own threshold.
pub const DEFAULT_LATE_THRESHOLD_MINUTES: i64 = 15;

/// Classification of a check-in relative to the late threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckInTiming {
    OnTime,
    Late,
}

/// Returns the cutoff timestamp separating on-time from late check-ins.
pub fn late_threshold(activity: &Activity) -> DateTime<Utc> {
    let minutes = activity
        .late_threshold_minutes
        .map(i64::from)
        .unwrap_or(DEFAULT_LATE_THRESHOLD_MINUTES);
    activity.start_time + Duration::minutes(minutes)
}

/// Classifies a check-in time against the activity's late threshold.
///
/// A check-in at exactly the threshold is on-time.
pub fn classify_check_in(check_in_time: DateTime<Utc>, activity: &Activity) -> CheckInTiming {
    if check_in_time <= late_threshold(activity) {
        CheckInTiming::OnTime
    } else {
        CheckInTiming::Late
    }
}

/// Returns the points awarded for a check-in with the given timing.
pub fn award_points(timing: CheckInTiming, activity: &Activity) -> i32 {
    match timing {
        CheckInTiming::OnTime => activity.on_time_points,
        CheckInTiming::Late => activity.late_points,
    }
}

/// Human-readable ledger reason for a check-in award.
pub fn award_reason(timing: CheckInTiming, activity_title: &str) -> String {
    match timing {
        CheckInTiming::OnTime => format!("Điểm danh đúng giờ: {}", activity_title),
        CheckInTiming::Late => format!("Điểm danh trễ: {}", activity_title),
    }
}

/// Error raised when a self-reported absence is not allowed in the current
/// participation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AbsenceReportError {
    #[error("Cannot report absence after check-in")]
    AlreadyCheckedIn,

    #[error("Absence already reported")]
    AlreadyReported,
}

/// Checks whether a participant in the given state may self-report absence.
///
/// Only `REGISTERED` participants may report; the guards are checked in the
/// documented order (checked-in first, then already-absent).
pub fn validate_absence_report(status: ParticipantStatus) -> Result<(), AbsenceReportError> {
    match status {
        ParticipantStatus::CheckedIn => Err(AbsenceReportError::AlreadyCheckedIn),
        ParticipantStatus::Absent => Err(AbsenceReportError::AlreadyReported),
        _ => Ok(()),
    }
}

/// Computes attendance statistics over the given participant set.
///
/// The caller passes the status-filtered (never search-filtered) set; the
/// rates degrade to `"0.0"` when their denominator is zero.
pub fn compute_stats(participants: &[ParticipantWithUser], activity: &Activity) -> AttendanceStats {
    let threshold = late_threshold(activity);

    let total = participants.len() as i64;
    let mut registered = 0i64;
    let mut checked_in = 0i64;
    let mut absent = 0i64;
    let mut completed = 0i64;
    let mut on_time = 0i64;
    let mut late = 0i64;

    for participant in participants {
        match participant.status {
            ParticipantStatus::Registered => registered += 1,
            ParticipantStatus::CheckedIn => {
                checked_in += 1;
                match participant.check_in_time {
                    Some(time) if time <= threshold => on_time += 1,
                    Some(_) => late += 1,
                    // Checked-in rows always carry a check-in time; a missing
                    // one is counted as late rather than dropped.
                    None => late += 1,
                }
            }
            ParticipantStatus::Absent => absent += 1,
            ParticipantStatus::Completed => completed += 1,
        }
    }

    AttendanceStats {
        total,
        registered,
        checked_in,
        on_time,
        late,
        absent,
        completed,
        late_threshold: threshold,
        attendance_rate: format_rate(checked_in, total),
        on_time_rate: format_rate(on_time, checked_in),
    }
}

/// Formats `numerator / denominator` as a percentage with one decimal place.
fn format_rate(numerator: i64, denominator: i64) -> String {
    if denominator == 0 {
        "0.0".to_string()
    } else {
        format!("{:.1}", numerator as f64 / denominator as f64 * 100.0)
    }
}

/// Returns true if the participant matches the free-text search term.
///
/// Full name and email match case-insensitively; phone matches as a plain
/// substring.
pub fn matches_search(participant: &ParticipantWithUser, term: &str) -> bool {
    let term_lower = term.to_lowercase();

    if participant.user.full_name.to_lowercase().contains(&term_lower) {
        return true;
    }
    if let Some(phone) = &participant.user.phone {
        if phone.contains(term) {
            return true;
        }
    }
    participant.user.email.to_lowercase().contains(&term_lower)
}
