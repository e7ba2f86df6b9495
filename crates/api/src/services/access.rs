//! Access control for administrative activity operations.
//!
//! Attendance administration (attendance query, status mutation, batch
//! check-in) and activity edits share one guard: the caller needs an
//! elevated role, and a unit-scoped role may only touch activities of its
//! own unit.

use domain::models::activity::Activity;
use domain::models::user::UserRole;
use uuid::Uuid;

use crate::error::ApiError;

/// Checks that the caller may administer the given activity.
pub fn ensure_can_administer_activity(
    role: UserRole,
    user_unit: Option<Uuid>,
    activity: &Activity,
) -> Result<(), ApiError> {
    if !role.is_elevated() {
        return Err(ApiError::Forbidden(
            "Requires a leader or admin role".to_string(),
        ));
    }

    if role.is_unit_scoped() {
        match (user_unit, activity.unit_id) {
            (Some(user_unit), Some(activity_unit)) if user_unit == activity_unit => {}
            _ => {
                return Err(ApiError::Forbidden(
                    "Activity belongs to a different unit".to_string(),
                ));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use domain::models::activity::ActivityStatus;

    fn activity_with_unit(unit_id: Option<Uuid>) -> Activity {
        let start = Utc.with_ymd_and_hms(2026, 2, 5, 14, 0, 0).unwrap();
        Activity {
            id: Uuid::new_v4(),
            title: "Unit meeting".to_string(),
            activity_type: "meeting".to_string(),
            status: ActivityStatus::Active,
            start_time: start,
            end_time: start + Duration::hours(2),
            location: None,
            organizer_id: Uuid::new_v4(),
            unit_id,
            on_time_points: 10,
            late_points: 2,
            late_threshold_minutes: None,
            created_at: start,
            updated_at: start,
        }
    }

    #[test]
    fn test_member_is_forbidden() {
        let activity = activity_with_unit(None);
        let result = ensure_can_administer_activity(UserRole::Member, None, &activity);
        assert!(matches!(result, Err(ApiError::Forbidden(_))));
    }

    #[test]
    fn test_admin_is_allowed_everywhere() {
        let unit = Uuid::new_v4();
        assert!(ensure_can_administer_activity(UserRole::Admin, None, &activity_with_unit(None)).is_ok());
        assert!(
            ensure_can_administer_activity(UserRole::Admin, None, &activity_with_unit(Some(unit)))
                .is_ok()
        );
    }

    #[test]
    fn test_leader_allowed_for_own_unit() {
        let unit = Uuid::new_v4();
        let activity = activity_with_unit(Some(unit));
        assert!(ensure_can_administer_activity(UserRole::Leader, Some(unit), &activity).is_ok());
    }

    #[test]
    fn test_leader_forbidden_for_other_unit() {
        let activity = activity_with_unit(Some(Uuid::new_v4()));
        let result =
            ensure_can_administer_activity(UserRole::Leader, Some(Uuid::new_v4()), &activity);
        assert!(matches!(result, Err(ApiError::Forbidden(_))));
    }

    #[test]
    fn test_leader_forbidden_for_unitless_activity() {
        let activity = activity_with_unit(None);
        let result =
            ensure_can_administer_activity(UserRole::Leader, Some(Uuid::new_v4()), &activity);
        assert!(matches!(result, Err(ApiError::Forbidden(_))));
    }

    #[test]
    fn test_leader_without_unit_is_forbidden() {
        let activity = activity_with_unit(Some(Uuid::new_v4()));
        let result = ensure_can_administer_activity(UserRole::Leader, None, &activity);
        assert!(matches!(result, Err(ApiError::Forbidden(_))));
    }
}
