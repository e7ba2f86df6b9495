//! Activity participant entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::participant::{ActivityParticipant, ParticipantStatus, ParticipantWithUser};
use domain::models::user::UserPublic;
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum mapping for the participant_status PostgreSQL type.
///
/// Declaration order matches the domain enum and the database type, so
/// ordering by the column sorts registered → checked_in → absent → completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "participant_status", rename_all = "snake_case")]
pub enum ParticipantStatusDb {
    Registered,
    CheckedIn,
    Absent,
    Completed,
}

impl From<ParticipantStatusDb> for ParticipantStatus {
    fn from(db_status: ParticipantStatusDb) -> Self {
        match db_status {
            ParticipantStatusDb::Registered => ParticipantStatus::Registered,
            ParticipantStatusDb::CheckedIn => ParticipantStatus::CheckedIn,
            ParticipantStatusDb::Absent => ParticipantStatus::Absent,
            ParticipantStatusDb::Completed => ParticipantStatus::Completed,
        }
    }
}

impl From<ParticipantStatus> for ParticipantStatusDb {
    fn from(status: ParticipantStatus) -> Self {
        match status {
            ParticipantStatus::Registered => ParticipantStatusDb::Registered,
            ParticipantStatus::CheckedIn => ParticipantStatusDb::CheckedIn,
            ParticipantStatus::Absent => ParticipantStatusDb::Absent,
            ParticipantStatus::Completed => ParticipantStatusDb::Completed,
        }
    }
}

/// Database row mapping for the activity_participants table.
#[derive(Debug, Clone, FromRow)]
pub struct ParticipantEntity {
    pub id: Uuid,
    pub activity_id: Uuid,
    pub user_id: Uuid,
    pub status: ParticipantStatusDb,
    pub check_in_time: Option<DateTime<Utc>>,
    pub points_earned: Option<i32>,
    pub absent_reason: Option<String>,
    pub registered_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ParticipantEntity> for ActivityParticipant {
    fn from(entity: ParticipantEntity) -> Self {
        Self {
            id: entity.id,
            activity_id: entity.activity_id,
            user_id: entity.user_id,
            status: entity.status.into(),
            check_in_time: entity.check_in_time,
            points_earned: entity.points_earned,
            absent_reason: entity.absent_reason,
            registered_at: entity.registered_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Participation row joined with the member's profile fields.
#[derive(Debug, Clone, FromRow)]
pub struct ParticipantWithUserEntity {
    pub id: Uuid,
    pub activity_id: Uuid,
    pub user_id: Uuid,
    pub status: ParticipantStatusDb,
    pub check_in_time: Option<DateTime<Utc>>,
    pub points_earned: Option<i32>,
    pub absent_reason: Option<String>,
    pub registered_at: DateTime<Utc>,
    // User fields
    pub full_name: String,
    pub phone: Option<String>,
    pub email: String,
}

impl From<ParticipantWithUserEntity> for ParticipantWithUser {
    fn from(entity: ParticipantWithUserEntity) -> Self {
        Self {
            id: entity.id,
            activity_id: entity.activity_id,
            status: entity.status.into(),
            check_in_time: entity.check_in_time,
            points_earned: entity.points_earned,
            absent_reason: entity.absent_reason,
            registered_at: entity.registered_at,
            user: UserPublic {
                id: entity.user_id,
                full_name: entity.full_name,
                phone: entity.phone,
                email: entity.email,
            },
        }
    }
}
