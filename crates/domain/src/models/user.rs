//! User domain models and role definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Role of a member within the organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Member,
    Leader,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Member => "member",
            UserRole::Leader => "leader",
            UserRole::Admin => "admin",
        }
    }

    /// Returns true for roles above the base member role. Elevated roles
    /// may create and edit activities and run administrative attendance
    /// operations (attendance query, status mutation, batch check-in).
    pub fn is_elevated(&self) -> bool {
        matches!(self, UserRole::Leader | UserRole::Admin)
    }

    /// Returns true if this role's administrative access is limited to its
    /// own organizational unit.
    pub fn is_unit_scoped(&self) -> bool {
        matches!(self, UserRole::Leader)
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "member" => Ok(UserRole::Member),
            "leader" => Ok(UserRole::Leader),
            "admin" => Ok(UserRole::Admin),
            _ => Err(format!("Invalid user role: {}", s)),
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A registered member of the organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub role: UserRole,
    pub unit_id: Option<Uuid>,
    /// Running points counter; kept in sync with the points history ledger.
    pub points: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Minimal user projection embedded in participant responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPublic {
    pub id: Uuid,
    pub full_name: String,
    pub phone: Option<String>,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_as_str() {
        assert_eq!(UserRole::Member.as_str(), "member");
        assert_eq!(UserRole::Leader.as_str(), "leader");
        assert_eq!(UserRole::Admin.as_str(), "admin");
    }

    #[test]
    fn test_user_role_from_str() {
        assert_eq!(UserRole::from_str("member").unwrap(), UserRole::Member);
        assert_eq!(UserRole::from_str("LEADER").unwrap(), UserRole::Leader);
        assert_eq!(UserRole::from_str("Admin").unwrap(), UserRole::Admin);
        assert!(UserRole::from_str("owner").is_err());
    }

    #[test]
    fn test_elevated_roles() {
        assert!(!UserRole::Member.is_elevated());
        assert!(UserRole::Leader.is_elevated());
        assert!(UserRole::Admin.is_elevated());
    }

    #[test]
    fn test_unit_scoping() {
        assert!(UserRole::Leader.is_unit_scoped());
        assert!(!UserRole::Admin.is_unit_scoped());
        assert!(!UserRole::Member.is_unit_scoped());
    }

    #[test]
    fn test_user_role_serde_lowercase() {
        assert_eq!(serde_json::to_string(&UserRole::Leader).unwrap(), "\"leader\"");
        let role: UserRole = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, UserRole::Admin);
    }
}
