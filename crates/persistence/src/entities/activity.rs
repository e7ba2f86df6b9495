//! Activity entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::activity::{Activity, ActivityStatus};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum mapping for the activity_status PostgreSQL type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "activity_status", rename_all = "lowercase")]
pub enum ActivityStatusDb {
    Draft,
    Active,
    Completed,
}

impl From<ActivityStatusDb> for ActivityStatus {
    fn from(db_status: ActivityStatusDb) -> Self {
        match db_status {
            ActivityStatusDb::Draft => ActivityStatus::Draft,
            ActivityStatusDb::Active => ActivityStatus::Active,
            ActivityStatusDb::Completed => ActivityStatus::Completed,
        }
    }
}

impl From<ActivityStatus> for ActivityStatusDb {
    fn from(status: ActivityStatus) -> Self {
        match status {
            ActivityStatus::Draft => ActivityStatusDb::Draft,
            ActivityStatus::Active => ActivityStatusDb::Active,
            ActivityStatus::Completed => ActivityStatusDb::Completed,
        }
    }
}

/// Database row mapping for the activities table.
#[derive(Debug, Clone, FromRow)]
pub struct ActivityEntity {
    pub id: Uuid,
    pub title: String,
    pub activity_type: String,
    pub status: ActivityStatusDb,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub location: Option<String>,
    pub organizer_id: Uuid,
    pub unit_id: Option<Uuid>,
    pub on_time_points: i32,
    pub late_points: i32,
    pub late_threshold_minutes: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ActivityEntity> for Activity {
    fn from(entity: ActivityEntity) -> Self {
        Self {
            id: entity.id,
            title: entity.title,
            activity_type: entity.activity_type,
            status: entity.status.into(),
            start_time: entity.start_time,
            end_time: entity.end_time,
            location: entity.location,
            organizer_id: entity.organizer_id,
            unit_id: entity.unit_id,
            on_time_points: entity.on_time_points,
            late_points: entity.late_points,
            late_threshold_minutes: entity.late_threshold_minutes,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
