//! Points ledger models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Kind of points ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointsEntryType {
    Earn,
    Deduct,
    Adjust,
}

impl PointsEntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PointsEntryType::Earn => "earn",
            PointsEntryType::Deduct => "deduct",
            PointsEntryType::Adjust => "adjust",
        }
    }
}

impl fmt::Display for PointsEntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One append-only points ledger entry.
///
/// Entries are written in the same transaction as the counter update they
/// document and are never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsHistoryEntry {
    pub id: i64,
    pub user_id: Uuid,
    pub activity_id: Option<Uuid>,
    pub points: i32,
    pub reason: String,
    pub entry_type: PointsEntryType,
    pub created_at: DateTime<Utc>,
}

/// Query parameters for the points history listing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PointsHistoryQuery {
    pub limit: Option<i64>,
    pub cursor: Option<String>,
}

/// Response for the points history listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsHistoryResponse {
    /// Current running balance from the user row.
    pub balance: i32,
    pub entries: Vec<PointsHistoryEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_type_as_str() {
        assert_eq!(PointsEntryType::Earn.as_str(), "earn");
        assert_eq!(PointsEntryType::Deduct.as_str(), "deduct");
        assert_eq!(PointsEntryType::Adjust.as_str(), "adjust");
    }

    #[test]
    fn test_entry_serializes_camel_case() {
        let entry = PointsHistoryEntry {
            id: 1,
            user_id: Uuid::new_v4(),
            activity_id: None,
            points: 10,
            reason: "Điểm danh đúng giờ: Sinh hoạt tháng 2".to_string(),
            entry_type: PointsEntryType::Earn,
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"userId\""));
        assert!(json.contains("\"entryType\":\"earn\""));
    }
}
