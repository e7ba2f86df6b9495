//! Activity participation models and attendance DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use crate::models::activity::ActivitySummary;
use crate::models::user::UserPublic;

/// Lifecycle state of a user's participation in one activity.
///
/// Declaration order is the sort order used by the attendance listing
/// (and the order of the backing database enum).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParticipantStatus {
    Registered,
    CheckedIn,
    Absent,
    Completed,
}

impl ParticipantStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParticipantStatus::Registered => "REGISTERED",
            ParticipantStatus::CheckedIn => "CHECKED_IN",
            ParticipantStatus::Absent => "ABSENT",
            ParticipantStatus::Completed => "COMPLETED",
        }
    }
}

impl FromStr for ParticipantStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "REGISTERED" => Ok(ParticipantStatus::Registered),
            "CHECKED_IN" => Ok(ParticipantStatus::CheckedIn),
            "ABSENT" => Ok(ParticipantStatus::Absent),
            "COMPLETED" => Ok(ParticipantStatus::Completed),
            _ => Err(format!("Invalid participant status: {}", s)),
        }
    }
}

impl fmt::Display for ParticipantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user's participation row for one activity.
///
/// `check_in_time` is set on the first transition to `CHECKED_IN` and never
/// cleared by later transitions; the first-check-in point award is gated on
/// it being unset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityParticipant {
    pub id: Uuid,
    pub activity_id: Uuid,
    pub user_id: Uuid,
    pub status: ParticipantStatus,
    pub check_in_time: Option<DateTime<Utc>>,
    pub points_earned: Option<i32>,
    pub absent_reason: Option<String>,
    pub registered_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Participation row joined with the member's public profile.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantWithUser {
    pub id: Uuid,
    pub activity_id: Uuid,
    pub status: ParticipantStatus,
    pub check_in_time: Option<DateTime<Utc>>,
    pub points_earned: Option<i32>,
    pub absent_reason: Option<String>,
    pub registered_at: DateTime<Utc>,
    pub user: UserPublic,
}

/// Request payload for self-reporting an absence.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReportAbsenceRequest {
    #[validate(
        custom(function = "shared::validation::validate_not_blank"),
        length(max = 500, message = "Reason must be at most 500 characters")
    )]
    pub reason: String,
}

/// Request payload for the admin attendance status update.
///
/// `status` arrives as a raw string so that invalid values map to a 400
/// instead of a body-rejection.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAttendanceRequest {
    pub status: String,
    pub absent_reason: Option<String>,
    pub check_in_time: Option<DateTime<Utc>>,
}

/// Request payload for batch check-in.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchCheckInRequest {
    pub user_ids: Vec<Uuid>,
}

/// Per-user outcome of a batch check-in.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchCheckInOutcome {
    pub user_id: Uuid,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl BatchCheckInOutcome {
    pub fn ok(user_id: Uuid) -> Self {
        Self {
            user_id,
            success: true,
            reason: None,
        }
    }

    pub fn failed(user_id: Uuid, reason: impl Into<String>) -> Self {
        Self {
            user_id,
            success: false,
            reason: Some(reason.into()),
        }
    }
}

/// Query parameters for the attendance listing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceQuery {
    pub status: Option<String>,
    pub search: Option<String>,
}

/// Attendance statistics for one activity.
///
/// Counts cover the status-filtered (but never search-filtered) participant
/// set; rates are percentages formatted to one decimal place.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceStats {
    pub total: i64,
    pub registered: i64,
    pub checked_in: i64,
    pub on_time: i64,
    pub late: i64,
    pub absent: i64,
    pub completed: i64,
    pub late_threshold: DateTime<Utc>,
    pub attendance_rate: String,
    pub on_time_rate: String,
}

/// Full attendance report for one activity.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceReport {
    pub activity: ActivitySummary,
    pub participants: Vec<ParticipantWithUser>,
    pub stats: AttendanceStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_participant_status_from_str() {
        assert_eq!(
            ParticipantStatus::from_str("REGISTERED").unwrap(),
            ParticipantStatus::Registered
        );
        assert_eq!(
            ParticipantStatus::from_str("checked_in").unwrap(),
            ParticipantStatus::CheckedIn
        );
        assert_eq!(
            ParticipantStatus::from_str("Absent").unwrap(),
            ParticipantStatus::Absent
        );
        assert!(ParticipantStatus::from_str("PRESENT").is_err());
    }

    #[test]
    fn test_participant_status_serde() {
        assert_eq!(
            serde_json::to_string(&ParticipantStatus::CheckedIn).unwrap(),
            "\"CHECKED_IN\""
        );
        let status: ParticipantStatus = serde_json::from_str("\"ABSENT\"").unwrap();
        assert_eq!(status, ParticipantStatus::Absent);
    }

    #[test]
    fn test_report_absence_request_blank_reason() {
        let request = ReportAbsenceRequest {
            reason: "   ".to_string(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_report_absence_request_valid() {
        let request = ReportAbsenceRequest {
            reason: "Family emergency".to_string(),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_batch_outcome_serialization_skips_empty_reason() {
        let outcome = BatchCheckInOutcome::ok(Uuid::new_v4());
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(json.contains("\"success\":true"));
        assert!(!json.contains("reason"));

        let failed = BatchCheckInOutcome::failed(Uuid::new_v4(), "Not found or already checked in");
        let json = serde_json::to_string(&failed).unwrap();
        assert!(json.contains("\"success\":false"));
        assert!(json.contains("Not found or already checked in"));
    }
}
