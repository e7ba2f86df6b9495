//! Activity domain models for scheduled unit activities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Lifecycle state of an activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityStatus {
    Draft,
    Active,
    Completed,
}

impl ActivityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityStatus::Draft => "draft",
            ActivityStatus::Active => "active",
            ActivityStatus::Completed => "completed",
        }
    }

    /// Returns true if members may still register for the activity.
    pub fn accepts_registrations(&self) -> bool {
        matches!(self, ActivityStatus::Active)
    }
}

impl FromStr for ActivityStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(ActivityStatus::Draft),
            "active" => Ok(ActivityStatus::Active),
            "completed" => Ok(ActivityStatus::Completed),
            _ => Err(format!("Invalid activity status: {}", s)),
        }
    }
}

impl fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A scheduled activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: Uuid,
    pub title: String,
    pub activity_type: String,
    pub status: ActivityStatus,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub location: Option<String>,
    pub organizer_id: Uuid,
    pub unit_id: Option<Uuid>,
    /// Points awarded for a punctual check-in.
    pub on_time_points: i32,
    /// Points awarded for a late check-in.
    pub late_points: i32,
    /// Minutes after start before a check-in counts as late; defaults to 15
    /// when unset.
    pub late_threshold_minutes: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for creating an activity.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateActivityRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,

    #[validate(length(min = 1, max = 50, message = "Activity type must be between 1 and 50 characters"))]
    pub activity_type: String,

    pub start_time: DateTime<Utc>,

    pub end_time: DateTime<Utc>,

    #[validate(length(max = 300, message = "Location must be at most 300 characters"))]
    pub location: Option<String>,

    pub unit_id: Option<Uuid>,

    #[validate(range(min = 0, max = 1000, message = "On-time points must be between 0 and 1000"))]
    pub on_time_points: Option<i32>,

    #[validate(range(min = 0, max = 1000, message = "Late points must be between 0 and 1000"))]
    pub late_points: Option<i32>,

    #[validate(range(min = 1, max = 1440, message = "Late threshold must be between 1 and 1440 minutes"))]
    pub late_threshold_minutes: Option<i32>,
}

/// Request payload for updating an activity.
///
/// `status` arrives as a raw string so that invalid values map to a 400
/// instead of a body-rejection.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateActivityRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 300, message = "Location must be at most 300 characters"))]
    pub location: Option<String>,

    pub status: Option<String>,
}

/// Query parameters for listing activities.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListActivitiesQuery {
    pub status: Option<String>,
}

/// Activity summary embedded in attendance responses and listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySummary {
    pub id: Uuid,
    pub title: String,
    pub activity_type: String,
    pub status: ActivityStatus,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub location: Option<String>,
    pub unit_id: Option<Uuid>,
    pub organizer_id: Uuid,
}

impl From<&Activity> for ActivitySummary {
    fn from(activity: &Activity) -> Self {
        Self {
            id: activity.id,
            title: activity.title.clone(),
            activity_type: activity.activity_type.clone(),
            status: activity.status,
            start_time: activity.start_time,
            end_time: activity.end_time,
            location: activity.location.clone(),
            unit_id: activity.unit_id,
            organizer_id: activity.organizer_id,
        }
    }
}

/// Activity detail with participation context for the caller.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityDetail {
    pub activity: Activity,
    pub participant_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub my_participation: Option<crate::models::participant::ActivityParticipant>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_request() -> CreateActivityRequest {
        CreateActivityRequest {
            title: "Monthly cleanup".to_string(),
            activity_type: "volunteer".to_string(),
            start_time: Utc.with_ymd_and_hms(2026, 2, 5, 14, 0, 0).unwrap(),
            end_time: Utc.with_ymd_and_hms(2026, 2, 5, 16, 0, 0).unwrap(),
            location: Some("Community center".to_string()),
            unit_id: None,
            on_time_points: Some(10),
            late_points: Some(2),
            late_threshold_minutes: None,
        }
    }

    #[test]
    fn test_activity_status_from_str() {
        assert_eq!(ActivityStatus::from_str("draft").unwrap(), ActivityStatus::Draft);
        assert_eq!(ActivityStatus::from_str("ACTIVE").unwrap(), ActivityStatus::Active);
        assert!(ActivityStatus::from_str("archived").is_err());
    }

    #[test]
    fn test_accepts_registrations() {
        assert!(!ActivityStatus::Draft.accepts_registrations());
        assert!(ActivityStatus::Active.accepts_registrations());
        assert!(!ActivityStatus::Completed.accepts_registrations());
    }

    #[test]
    fn test_create_activity_request_valid() {
        assert!(sample_request().validate().is_ok());
    }

    #[test]
    fn test_create_activity_request_empty_title() {
        let mut request = sample_request();
        request.title = String::new();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_activity_request_negative_points() {
        let mut request = sample_request();
        request.on_time_points = Some(-5);
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_activity_request_zero_threshold() {
        let mut request = sample_request();
        request.late_threshold_minutes = Some(0);
        assert!(request.validate().is_err());
    }
}
