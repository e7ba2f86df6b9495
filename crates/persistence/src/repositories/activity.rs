//! Activity repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{ActivityEntity, ActivityStatusDb};
use crate::metrics::QueryTimer;

/// Repository for activity-related database operations.
#[derive(Clone)]
pub struct ActivityRepository {
    pool: PgPool,
}

impl ActivityRepository {
    /// Creates a new ActivityRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new activity in draft state.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_activity(
        &self,
        title: &str,
        activity_type: &str,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        location: Option<&str>,
        organizer_id: Uuid,
        unit_id: Option<Uuid>,
        on_time_points: i32,
        late_points: i32,
        late_threshold_minutes: Option<i32>,
    ) -> Result<ActivityEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_activity");
        let result = sqlx::query_as::<_, ActivityEntity>(
            r#"
            INSERT INTO activities (title, activity_type, start_time, end_time, location, organizer_id, unit_id, on_time_points, late_points, late_threshold_minutes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, title, activity_type, status, start_time, end_time, location, organizer_id, unit_id, on_time_points, late_points, late_threshold_minutes, created_at, updated_at
            "#,
        )
        .bind(title)
        .bind(activity_type)
        .bind(start_time)
        .bind(end_time)
        .bind(location)
        .bind(organizer_id)
        .bind(unit_id)
        .bind(on_time_points)
        .bind(late_points)
        .bind(late_threshold_minutes)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find an activity by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ActivityEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_activity_by_id");
        let result = sqlx::query_as::<_, ActivityEntity>(
            r#"
            SELECT id, title, activity_type, status, start_time, end_time, location, organizer_id, unit_id, on_time_points, late_points, late_threshold_minutes, created_at, updated_at
            FROM activities
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List activities, optionally filtered by status, newest start first.
    pub async fn list(
        &self,
        status: Option<ActivityStatusDb>,
    ) -> Result<Vec<ActivityEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_activities");

        let result = if let Some(status) = status {
            sqlx::query_as::<_, ActivityEntity>(
                r#"
                SELECT id, title, activity_type, status, start_time, end_time, location, organizer_id, unit_id, on_time_points, late_points, late_threshold_minutes, created_at, updated_at
                FROM activities
                WHERE status = $1
                ORDER BY start_time DESC
                "#,
            )
            .bind(status)
            .fetch_all(&self.pool)
            .await
        } else {
            sqlx::query_as::<_, ActivityEntity>(
                r#"
                SELECT id, title, activity_type, status, start_time, end_time, location, organizer_id, unit_id, on_time_points, late_points, late_threshold_minutes, created_at, updated_at
                FROM activities
                ORDER BY start_time DESC
                "#,
            )
            .fetch_all(&self.pool)
            .await
        };

        timer.record();
        result
    }

    /// Update an activity's mutable fields; absent fields keep their value.
    pub async fn update_activity(
        &self,
        id: Uuid,
        title: Option<&str>,
        location: Option<&str>,
        status: Option<ActivityStatusDb>,
    ) -> Result<Option<ActivityEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_activity");
        let result = sqlx::query_as::<_, ActivityEntity>(
            r#"
            UPDATE activities
            SET title = COALESCE($2, title),
                location = COALESCE($3, location),
                status = COALESCE($4, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, activity_type, status, start_time, end_time, location, organizer_id, unit_id, on_time_points, late_points, late_threshold_minutes, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(location)
        .bind(status)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Count participation rows for an activity.
    pub async fn count_participants(&self, activity_id: Uuid) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_activity_participants");
        let result: Result<(i64,), sqlx::Error> = sqlx::query_as(
            "SELECT COUNT(*) FROM activity_participants WHERE activity_id = $1",
        )
        .bind(activity_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result.map(|row| row.0)
    }
}
