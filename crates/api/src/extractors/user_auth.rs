//! User JWT authentication extractor.
//!
//! Provides an Axum extractor for validating JWT tokens from requests.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::user_auth::UserAuth as UserAuthData;

/// Authenticated user information from JWT.
///
/// This extractor validates the Bearer token in the Authorization header
/// and provides access to the authenticated user's details.
#[derive(Debug, Clone)]
pub struct UserAuth {
    /// User ID from the JWT subject claim.
    pub user_id: Uuid,
    /// JWT ID (jti) for session tracking.
    #[allow(dead_code)] // Carried for log correlation
    pub jti: String,
}

impl From<UserAuthData> for UserAuth {
    fn from(data: UserAuthData) -> Self {
        Self {
            user_id: data.user_id,
            jti: data.jti,
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for UserAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Auth info inserted by the middleware takes precedence
        if let Some(auth) = parts.extensions.get::<UserAuthData>() {
            return Ok(auth.clone().into());
        }

        // Otherwise, extract and validate the token directly
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

        if !auth_header.starts_with("Bearer ") {
            return Err(ApiError::Unauthorized(
                "Invalid Authorization header format".to_string(),
            ));
        }

        let token = &auth_header[7..];

        let jwt_config =
            UserAuthData::create_jwt_config(&state.config.jwt).map_err(ApiError::Internal)?;

        let auth_data = UserAuthData::validate(&jwt_config, token)
            .map_err(|_| ApiError::Unauthorized("Invalid or expired token".to_string()))?;

        Ok(auth_data.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_auth_from_data() {
        let data = UserAuthData {
            user_id: Uuid::new_v4(),
            jti: "test_jti".to_string(),
        };
        let auth: UserAuth = data.clone().into();
        assert_eq!(auth.user_id, data.user_id);
        assert_eq!(auth.jti, "test_jti");
    }

    #[test]
    fn test_user_auth_debug() {
        let auth = UserAuth {
            user_id: Uuid::new_v4(),
            jti: "test_jti".to_string(),
        };
        let debug_str = format!("{:?}", auth);
        assert!(debug_str.contains("UserAuth"));
        assert!(debug_str.contains("user_id"));
    }
}
