//! Points ledger routes.

use axum::{
    extract::{Query, State},
    Json,
};
use tracing::info;

use domain::models::points::{PointsHistoryEntry, PointsHistoryQuery, PointsHistoryResponse};
use persistence::repositories::{PointsHistoryRepository, UserRepository};
use shared::pagination::{decode_cursor, encode_cursor};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::response::ApiResponse;

const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

/// The caller's points balance and ledger entries, newest first.
///
/// GET /api/users/me/points?limit=&cursor=
pub async fn my_points_history(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Query(query): Query<PointsHistoryQuery>,
) -> Result<Json<ApiResponse<PointsHistoryResponse>>, ApiError> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);

    let before = query
        .cursor
        .as_deref()
        .map(decode_cursor)
        .transpose()
        .map_err(|_| ApiError::Validation("Invalid cursor".to_string()))?;

    let user = UserRepository::new(state.pool.clone())
        .find_by_id(user_auth.user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("User account not found".to_string()))?;

    let repo = PointsHistoryRepository::new(state.pool.clone());
    // Fetch one extra row to detect whether another page exists.
    let mut entries: Vec<PointsHistoryEntry> = repo
        .list_by_user(user.id, limit + 1, before)
        .await?
        .into_iter()
        .map(PointsHistoryEntry::from)
        .collect();

    let next_cursor = if entries.len() as i64 > limit {
        entries.truncate(limit as usize);
        entries
            .last()
            .map(|entry| encode_cursor(entry.created_at, entry.id))
    } else {
        None
    };

    info!(
        user_id = %user.id,
        entry_count = entries.len(),
        "Points history retrieved"
    );

    Ok(Json(ApiResponse::ok(PointsHistoryResponse {
        balance: user.points,
        entries,
        next_cursor,
    })))
}
