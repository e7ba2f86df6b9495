//! Points history entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::points::{PointsEntryType, PointsHistoryEntry};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum mapping for the points_entry_type PostgreSQL type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "points_entry_type", rename_all = "lowercase")]
pub enum PointsEntryTypeDb {
    Earn,
    Deduct,
    Adjust,
}

impl From<PointsEntryTypeDb> for PointsEntryType {
    fn from(db_type: PointsEntryTypeDb) -> Self {
        match db_type {
            PointsEntryTypeDb::Earn => PointsEntryType::Earn,
            PointsEntryTypeDb::Deduct => PointsEntryType::Deduct,
            PointsEntryTypeDb::Adjust => PointsEntryType::Adjust,
        }
    }
}

impl From<PointsEntryType> for PointsEntryTypeDb {
    fn from(entry_type: PointsEntryType) -> Self {
        match entry_type {
            PointsEntryType::Earn => PointsEntryTypeDb::Earn,
            PointsEntryType::Deduct => PointsEntryTypeDb::Deduct,
            PointsEntryType::Adjust => PointsEntryTypeDb::Adjust,
        }
    }
}

/// Database row mapping for the points_history table.
#[derive(Debug, Clone, FromRow)]
pub struct PointsHistoryEntity {
    pub id: i64,
    pub user_id: Uuid,
    pub activity_id: Option<Uuid>,
    pub points: i32,
    pub reason: String,
    pub entry_type: PointsEntryTypeDb,
    pub created_at: DateTime<Utc>,
}

impl From<PointsHistoryEntity> for PointsHistoryEntry {
    fn from(entity: PointsHistoryEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            activity_id: entity.activity_id,
            points: entity.points,
            reason: entity.reason,
            entry_type: entity.entry_type.into(),
            created_at: entity.created_at,
        }
    }
}
