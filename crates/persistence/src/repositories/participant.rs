//! Activity participant repository for database operations.
//!
//! The first-check-in point award lives here as a single transactional
//! operation shared by every check-in entry point (admin mutator, self
//! check-in, batch check-in).

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{ParticipantEntity, ParticipantStatusDb, ParticipantWithUserEntity};
use crate::metrics::QueryTimer;

/// Repository for participation-related database operations.
#[derive(Clone)]
pub struct ParticipantRepository {
    pool: PgPool,
}

impl ParticipantRepository {
    /// Creates a new ParticipantRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register a user for an activity.
    ///
    /// The unique constraint on (activity_id, user_id) surfaces a duplicate
    /// registration as a database error for the caller to map.
    pub async fn register(
        &self,
        activity_id: Uuid,
        user_id: Uuid,
    ) -> Result<ParticipantEntity, sqlx::Error> {
        let timer = QueryTimer::new("register_participant");
        let result = sqlx::query_as::<_, ParticipantEntity>(
            r#"
            INSERT INTO activity_participants (activity_id, user_id)
            VALUES ($1, $2)
            RETURNING id, activity_id, user_id, status, check_in_time, points_earned, absent_reason, registered_at, updated_at
            "#,
        )
        .bind(activity_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a participation row by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ParticipantEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_participant_by_id");
        let result = sqlx::query_as::<_, ParticipantEntity>(
            r#"
            SELECT id, activity_id, user_id, status, check_in_time, points_earned, absent_reason, registered_at, updated_at
            FROM activity_participants
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a participation row by activity and user.
    pub async fn find_by_activity_and_user(
        &self,
        activity_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<ParticipantEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_participant_by_activity_and_user");
        let result = sqlx::query_as::<_, ParticipantEntity>(
            r#"
            SELECT id, activity_id, user_id, status, check_in_time, points_earned, absent_reason, registered_at, updated_at
            FROM activity_participants
            WHERE activity_id = $1 AND user_id = $2
            "#,
        )
        .bind(activity_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List an activity's participants joined with member profiles.
    ///
    /// Ordered by participant status (enum declaration order), then full
    /// name. Free-text search is applied in memory by the caller, not here.
    pub async fn list_with_users(
        &self,
        activity_id: Uuid,
        status: Option<ParticipantStatusDb>,
    ) -> Result<Vec<ParticipantWithUserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_participants_with_users");

        let result = if let Some(status) = status {
            sqlx::query_as::<_, ParticipantWithUserEntity>(
                r#"
                SELECT
                    ap.id, ap.activity_id, ap.user_id, ap.status, ap.check_in_time,
                    ap.points_earned, ap.absent_reason, ap.registered_at,
                    u.full_name, u.phone, u.email
                FROM activity_participants ap
                JOIN users u ON ap.user_id = u.id
                WHERE ap.activity_id = $1 AND ap.status = $2
                ORDER BY ap.status, u.full_name ASC
                "#,
            )
            .bind(activity_id)
            .bind(status)
            .fetch_all(&self.pool)
            .await
        } else {
            sqlx::query_as::<_, ParticipantWithUserEntity>(
                r#"
                SELECT
                    ap.id, ap.activity_id, ap.user_id, ap.status, ap.check_in_time,
                    ap.points_earned, ap.absent_reason, ap.registered_at,
                    u.full_name, u.phone, u.email
                FROM activity_participants ap
                JOIN users u ON ap.user_id = u.id
                WHERE ap.activity_id = $1
                ORDER BY ap.status, u.full_name ASC
                "#,
            )
            .bind(activity_id)
            .fetch_all(&self.pool)
            .await
        };

        timer.record();
        result
    }

    /// Update a participation row's status.
    ///
    /// An absence reason, when given, replaces the stored one; otherwise the
    /// stored value is left untouched. Does not touch check_in_time or
    /// points_earned.
    pub async fn set_status(
        &self,
        participant_id: Uuid,
        status: ParticipantStatusDb,
        absent_reason: Option<&str>,
    ) -> Result<Option<ParticipantEntity>, sqlx::Error> {
        let timer = QueryTimer::new("set_participant_status");
        let result = sqlx::query_as::<_, ParticipantEntity>(
            r#"
            UPDATE activity_participants
            SET status = $2,
                absent_reason = COALESCE($3, absent_reason),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, activity_id, user_id, status, check_in_time, points_earned, absent_reason, registered_at, updated_at
            "#,
        )
        .bind(participant_id)
        .bind(status)
        .bind(absent_reason)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Record a self-reported absence: status and trimmed reason together.
    pub async fn report_absence(
        &self,
        participant_id: Uuid,
        reason: &str,
    ) -> Result<Option<ParticipantEntity>, sqlx::Error> {
        let timer = QueryTimer::new("report_participant_absence");
        let result = sqlx::query_as::<_, ParticipantEntity>(
            r#"
            UPDATE activity_participants
            SET status = 'absent',
                absent_reason = $2,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, activity_id, user_id, status, check_in_time, points_earned, absent_reason, registered_at, updated_at
            "#,
        )
        .bind(participant_id)
        .bind(reason)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// First check-in with point award, as one atomic operation.
    ///
    /// The participant update is conditional on `check_in_time IS NULL`, so
    /// the database enforces at-most-once award semantics under concurrent
    /// callers. When the row was already checked in (or does not exist) no
    /// statement in the transaction takes effect and `None` is returned.
    ///
    /// On success the participation row, the user's running points counter,
    /// and the points history ledger are updated together.
    pub async fn check_in(
        &self,
        participant_id: Uuid,
        check_in_time: DateTime<Utc>,
        points: i32,
        reason: &str,
        activity_id: Uuid,
    ) -> Result<Option<ParticipantEntity>, sqlx::Error> {
        let timer = QueryTimer::new("check_in_participant");

        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query_as::<_, ParticipantEntity>(
            r#"
            UPDATE activity_participants
            SET status = 'checked_in',
                check_in_time = $2,
                points_earned = $3,
                updated_at = NOW()
            WHERE id = $1 AND check_in_time IS NULL
            RETURNING id, activity_id, user_id, status, check_in_time, points_earned, absent_reason, registered_at, updated_at
            "#,
        )
        .bind(participant_id)
        .bind(check_in_time)
        .bind(points)
        .fetch_optional(&mut *tx)
        .await?;

        let participant = match updated {
            Some(participant) => participant,
            None => {
                timer.record();
                return Ok(None);
            }
        };

        sqlx::query(
            r#"
            UPDATE users
            SET points = points + $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(participant.user_id)
        .bind(points)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO points_history (user_id, activity_id, points, reason, entry_type)
            VALUES ($1, $2, $3, $4, 'earn')
            "#,
        )
        .bind(participant.user_id)
        .bind(activity_id)
        .bind(points)
        .bind(reason)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();

        tracing::debug!(
            participant_id = %participant.id,
            user_id = %participant.user_id,
            points = points,
            "Check-in recorded with point award"
        );

        Ok(Some(participant))
    }
}
