//! User repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::UserEntity;
use crate::metrics::QueryTimer;

/// Repository for user-related database operations.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Creates a new UserRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new member account.
    ///
    /// New accounts always get the base member role and a zero points
    /// balance; role changes are an administrative concern.
    pub async fn create_member(
        &self,
        email: &str,
        password_hash: &str,
        full_name: &str,
        phone: Option<&str>,
        unit_id: Option<Uuid>,
    ) -> Result<UserEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_member");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            INSERT INTO users (email, password_hash, full_name, phone, unit_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, email, password_hash, full_name, phone, role, unit_id, points, is_active, created_at, updated_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(full_name)
        .bind(phone)
        .bind(unit_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a user by email.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_email");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, email, password_hash, full_name, phone, role, unit_id, points, is_active, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_id");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, email, password_hash, full_name, phone, role, unit_id, points, is_active, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }
}
