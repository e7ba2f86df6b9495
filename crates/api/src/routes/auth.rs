//! Authentication routes for member registration, login, and token refresh.

use axum::{extract::State, http::StatusCode, Json};
use domain::models::user::User;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::services::auth::{AuthError, AuthResult, AuthService};

/// Request body for member registration.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    #[validate(length(min = 1, max = 100, message = "Full name must be 1-100 characters"))]
    pub full_name: String,

    #[validate(custom(function = "shared::validation::validate_phone"))]
    pub phone: Option<String>,

    /// Optional organizational unit to join at registration.
    pub unit_id: Option<Uuid>,
}

/// Request body for login.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Request body for token refresh.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Token information in auth responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokensResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Response body for registration and login.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: User,
    pub tokens: TokensResponse,
}

impl From<AuthResult> for AuthResponse {
    fn from(result: AuthResult) -> Self {
        Self {
            user: result.user.into(),
            tokens: TokensResponse {
                access_token: result.access_token,
                refresh_token: result.refresh_token,
                token_type: "Bearer".to_string(),
                expires_in: result.access_token_expires_in,
            },
        }
    }
}

fn map_auth_error(error: AuthError) -> ApiError {
    match error {
        AuthError::EmailAlreadyExists => ApiError::Conflict("Email already registered".to_string()),
        AuthError::WeakPassword(msg) => ApiError::Validation(msg),
        AuthError::InvalidCredentials => {
            ApiError::Unauthorized("Invalid email or password".to_string())
        }
        AuthError::UserDisabled => ApiError::Forbidden("Account is disabled".to_string()),
        AuthError::InvalidRefreshToken => {
            ApiError::Unauthorized("Invalid refresh token".to_string())
        }
        AuthError::DatabaseError(db_err) => ApiError::from(db_err),
        AuthError::PasswordError(e) => ApiError::Internal(format!("Password error: {}", e)),
        AuthError::TokenError(e) => ApiError::Internal(format!("Token error: {}", e)),
        AuthError::Internal(msg) => ApiError::Internal(msg),
    }
}

/// Register a new member.
///
/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), ApiError> {
    request.validate()?;

    let auth_service = AuthService::new(state.pool.clone(), &state.config.jwt)
        .map_err(|e| ApiError::Internal(format!("Failed to initialize auth service: {}", e)))?;

    let result = auth_service
        .register(
            &request.email,
            &request.password,
            &request.full_name,
            request.phone.as_deref(),
            request.unit_id,
        )
        .await
        .map_err(map_auth_error)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(result.into())),
    ))
}

/// Log a member in.
///
/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    request.validate()?;

    let auth_service = AuthService::new(state.pool.clone(), &state.config.jwt)
        .map_err(|e| ApiError::Internal(format!("Failed to initialize auth service: {}", e)))?;

    let result = auth_service
        .login(&request.email, &request.password)
        .await
        .map_err(map_auth_error)?;

    Ok(Json(ApiResponse::ok(result.into())))
}

/// Exchange a refresh token for a new token pair.
///
/// POST /api/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<ApiResponse<TokensResponse>>, ApiError> {
    let auth_service = AuthService::new(state.pool.clone(), &state.config.jwt)
        .map_err(|e| ApiError::Internal(format!("Failed to initialize auth service: {}", e)))?;

    let result = auth_service
        .refresh(&request.refresh_token)
        .await
        .map_err(map_auth_error)?;

    Ok(Json(ApiResponse::ok(TokensResponse {
        access_token: result.access_token,
        refresh_token: result.refresh_token,
        token_type: "Bearer".to_string(),
        expires_in: result.expires_in,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_register() -> RegisterRequest {
        RegisterRequest {
            email: "test@example.com".to_string(),
            password: "SecureP4ss".to_string(),
            full_name: "Test Member".to_string(),
            phone: Some("0911111111".to_string()),
            unit_id: None,
        }
    }

    #[test]
    fn test_register_request_valid() {
        assert!(sample_register().validate().is_ok());
    }

    #[test]
    fn test_register_request_invalid_email() {
        let mut request = sample_register();
        request.email = "not-an-email".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_register_request_empty_password() {
        let mut request = sample_register();
        request.password = String::new();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_register_request_invalid_phone() {
        let mut request = sample_register();
        request.phone = Some("12345".to_string());
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_register_request_no_phone_is_valid() {
        let mut request = sample_register();
        request.phone = None;
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_login_request_requires_email() {
        let request = LoginRequest {
            email: "nope".to_string(),
            password: "SecureP4ss".to_string(),
        };
        assert!(request.validate().is_err());
    }
}
