//! Authentication service for user registration, login, and token refresh.

use persistence::repositories::UserRepository;
use shared::jwt::{extract_user_id, JwtConfig, JwtError};
use shared::password::{hash_password, verify_password, PasswordError};
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::config::JwtAuthConfig;
use persistence::entities::UserEntity;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email already registered")]
    EmailAlreadyExists,

    #[error("Password does not meet requirements")]
    WeakPassword(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User is disabled")]
    UserDisabled,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Token error: {0}")]
    TokenError(#[from] JwtError),

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result of a successful registration or login.
#[derive(Debug)]
pub struct AuthResult {
    pub user: UserEntity,
    pub access_token: String,
    pub refresh_token: String,
    pub access_token_expires_in: i64,
}

/// Result of a successful token refresh.
#[derive(Debug, Clone)]
pub struct RefreshResult {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

/// Authentication service.
pub struct AuthService {
    users: UserRepository,
    jwt_config: JwtConfig,
    access_token_expiry: i64,
}

impl AuthService {
    /// Creates a new AuthService with the given database pool and JWT
    /// configuration.
    pub fn new(pool: PgPool, jwt_config: &JwtAuthConfig) -> Result<Self, AuthError> {
        let private_key = normalize_pem_key(&jwt_config.private_key);
        let public_key = normalize_pem_key(&jwt_config.public_key);

        let jwt = JwtConfig::with_leeway(
            &private_key,
            &public_key,
            jwt_config.access_token_expiry_secs,
            jwt_config.refresh_token_expiry_secs,
            jwt_config.leeway_secs,
        )
        .map_err(|e| AuthError::Internal(format!("Failed to initialize JWT: {}", e)))?;

        Ok(Self {
            users: UserRepository::new(pool),
            jwt_config: jwt,
            access_token_expiry: jwt_config.access_token_expiry_secs,
        })
    }

    /// Register a new member with email and password.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
        phone: Option<&str>,
        unit_id: Option<Uuid>,
    ) -> Result<AuthResult, AuthError> {
        validate_password(password)?;

        let password_hash = hash_password(password)?;
        let email = email.to_lowercase();

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailAlreadyExists);
        }

        let insert_result = self
            .users
            .create_member(&email, &password_hash, full_name, phone, unit_id)
            .await;

        // A concurrent registration can still hit the unique constraint
        // between the check above and the insert.
        let user = match insert_result {
            Err(sqlx::Error::Database(db_err)) if db_err.code().as_deref() == Some("23505") => {
                return Err(AuthError::EmailAlreadyExists);
            }
            other => other?,
        };

        let tokens = self.issue_tokens(user.id)?;

        tracing::info!(user_id = %user.id, "User registered");

        Ok(AuthResult {
            user,
            access_token: tokens.0,
            refresh_token: tokens.1,
            access_token_expires_in: self.access_token_expiry,
        })
    }

    /// Log a member in with email and password.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResult, AuthError> {
        let email = email.to_lowercase();

        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        if !user.is_active {
            return Err(AuthError::UserDisabled);
        }

        let tokens = self.issue_tokens(user.id)?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(AuthResult {
            user,
            access_token: tokens.0,
            refresh_token: tokens.1,
            access_token_expires_in: self.access_token_expiry,
        })
    }

    /// Exchange a valid refresh token for a new token pair.
    pub async fn refresh(&self, refresh_token: &str) -> Result<RefreshResult, AuthError> {
        let claims = self
            .jwt_config
            .validate_refresh_token(refresh_token)
            .map_err(|_| AuthError::InvalidRefreshToken)?;

        let user_id = extract_user_id(&claims).map_err(|_| AuthError::InvalidRefreshToken)?;

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::InvalidRefreshToken)?;

        if !user.is_active {
            return Err(AuthError::UserDisabled);
        }

        let (access_token, refresh_token) = self.issue_tokens(user.id)?;

        Ok(RefreshResult {
            access_token,
            refresh_token,
            expires_in: self.access_token_expiry,
        })
    }

    fn issue_tokens(&self, user_id: Uuid) -> Result<(String, String), AuthError> {
        let (access_token, _) = self.jwt_config.generate_access_token(user_id)?;
        let (refresh_token, _) = self.jwt_config.generate_refresh_token(user_id)?;
        Ok((access_token, refresh_token))
    }
}

/// Password policy: at least 8 characters with an upper-case letter, a
/// lower-case letter, and a digit.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < 8 {
        return Err(AuthError::WeakPassword(
            "Password must be at least 8 characters".to_string(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(AuthError::WeakPassword(
            "Password must contain an upper-case letter".to_string(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(AuthError::WeakPassword(
            "Password must contain a lower-case letter".to_string(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(AuthError::WeakPassword(
            "Password must contain a digit".to_string(),
        ));
    }
    Ok(())
}

/// Normalize a PEM key by converting literal `\n` sequences (as they appear
/// when the key is passed through an environment variable) to real newlines.
fn normalize_pem_key(key: &str) -> String {
    let key = key.trim_matches('"').trim_matches('\'');
    key.replace("\\n", "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_policy() {
        assert!(validate_password("SecureP4ss").is_ok());
        assert!(validate_password("short1A").is_err());
        assert!(validate_password("nouppercase1").is_err());
        assert!(validate_password("NOLOWERCASE1").is_err());
        assert!(validate_password("NoDigitsHere").is_err());
    }

    #[test]
    fn test_normalize_pem_key_literal_newlines() {
        let raw = "-----BEGIN KEY-----\\nabc\\n-----END KEY-----";
        let normalized = normalize_pem_key(raw);
        assert_eq!(normalized.matches('\n').count(), 2);
    }

    #[test]
    fn test_normalize_pem_key_strips_quotes() {
        let raw = "\"-----BEGIN KEY-----\"";
        assert_eq!(normalize_pem_key(raw), "-----BEGIN KEY-----");
    }
}
