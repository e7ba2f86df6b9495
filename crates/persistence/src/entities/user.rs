//! User entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::user::{User, UserPublic, UserRole};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum mapping for the user_role PostgreSQL type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
pub enum UserRoleDb {
    Member,
    Leader,
    Admin,
}

impl From<UserRoleDb> for UserRole {
    fn from(db_role: UserRoleDb) -> Self {
        match db_role {
            UserRoleDb::Member => UserRole::Member,
            UserRoleDb::Leader => UserRole::Leader,
            UserRoleDb::Admin => UserRole::Admin,
        }
    }
}

impl From<UserRole> for UserRoleDb {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Member => UserRoleDb::Member,
            UserRole::Leader => UserRoleDb::Leader,
            UserRole::Admin => UserRoleDb::Admin,
        }
    }
}

/// Database row mapping for the users table.
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub role: UserRoleDb,
    pub unit_id: Option<Uuid>,
    pub points: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserEntity> for User {
    fn from(entity: UserEntity) -> Self {
        Self {
            id: entity.id,
            email: entity.email,
            full_name: entity.full_name,
            phone: entity.phone,
            role: entity.role.into(),
            unit_id: entity.unit_id,
            points: entity.points,
            is_active: entity.is_active,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

impl From<&UserEntity> for UserPublic {
    fn from(entity: &UserEntity) -> Self {
        Self {
            id: entity.id,
            full_name: entity.full_name.clone(),
            phone: entity.phone.clone(),
            email: entity.email.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_conversions_roundtrip() {
        for role in [UserRole::Member, UserRole::Leader, UserRole::Admin] {
            let db: UserRoleDb = role.into();
            let back: UserRole = db.into();
            assert_eq!(back, role);
        }
    }
}
