//! Points history repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::PointsHistoryEntity;
use crate::metrics::QueryTimer;

/// Repository for points ledger reads.
///
/// Ledger writes happen inside the check-in transaction in
/// `ParticipantRepository`; this repository only reads.
#[derive(Clone)]
pub struct PointsHistoryRepository {
    pool: PgPool,
}

impl PointsHistoryRepository {
    /// Creates a new PointsHistoryRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List a user's ledger entries, newest first, with keyset pagination.
    ///
    /// `before` is the (created_at, id) pair of the last entry on the
    /// previous page; entries strictly older than it are returned.
    pub async fn list_by_user(
        &self,
        user_id: Uuid,
        limit: i64,
        before: Option<(DateTime<Utc>, i64)>,
    ) -> Result<Vec<PointsHistoryEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_points_history_by_user");

        let result = if let Some((created_at, id)) = before {
            sqlx::query_as::<_, PointsHistoryEntity>(
                r#"
                SELECT id, user_id, activity_id, points, reason, entry_type, created_at
                FROM points_history
                WHERE user_id = $1 AND (created_at, id) < ($2, $3)
                ORDER BY created_at DESC, id DESC
                LIMIT $4
                "#,
            )
            .bind(user_id)
            .bind(created_at)
            .bind(id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
        } else {
            sqlx::query_as::<_, PointsHistoryEntity>(
                r#"
                SELECT id, user_id, activity_id, points, reason, entry_type, created_at
                FROM points_history
                WHERE user_id = $1
                ORDER BY created_at DESC, id DESC
                LIMIT $2
                "#,
            )
            .bind(user_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
        };

        timer.record();
        result
    }
}
