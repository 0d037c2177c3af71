//! Auth Error Types
//!
//! Auth-specific error variants that integrate with the unified
//! `kernel::error::AppError` system. Every variant carries a fixed HTTP
//! status and a stable machine code so clients can branch on failures
//! without parsing messages. Server-side detail never leaves the process.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::application::tokens::TokenError;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Missing or malformed request input
    #[error("{0}")]
    Validation(String),

    /// Unknown username or wrong password. Deliberately one variant for
    /// both, so responses cannot be used for username enumeration.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Wrong current password on a profile update
    #[error("Current password is incorrect")]
    InvalidPassword,

    /// No access token on a protected request
    #[error("Access token required")]
    MissingToken,

    /// No refresh token on a refresh request
    #[error("Refresh token required")]
    MissingRefreshToken,

    /// Access token past its expiry (recoverable via silent refresh)
    #[error("Token expired")]
    TokenExpired,

    /// Malformed, forged, wrong-type, or revoked token
    #[error("Invalid or expired token")]
    InvalidToken,

    /// Account exists but has been deactivated
    #[error("Admin account is deactivated")]
    AccountDeactivated,

    /// Refresh attempted for an admin that no longer exists or is inactive
    #[error("Admin account no longer active")]
    AccountInactive,

    /// Authenticated but lacking the required role
    #[error("Insufficient permissions")]
    Forbidden,

    /// Admin record not found
    #[error("Admin not found")]
    AdminNotFound,

    /// Username already taken (case-insensitive)
    #[error("Username is already taken")]
    DuplicateUsername,

    /// Email already taken
    #[error("Email is already taken")]
    DuplicateEmail,

    /// Too many failed attempts from this source address
    #[error("Too many failed attempts. Please try again later.")]
    LockedOut,

    /// Missing signing secret or similar bootstrap misconfiguration.
    /// Kept distinct from `Internal` so operators can tell a bad deploy
    /// from a transient failure.
    #[error("Server configuration error: {0}")]
    Configuration(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials
            | AuthError::InvalidPassword
            | AuthError::MissingToken
            | AuthError::MissingRefreshToken
            | AuthError::TokenExpired => StatusCode::UNAUTHORIZED,
            AuthError::InvalidToken
            | AuthError::AccountDeactivated
            | AuthError::AccountInactive
            | AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::AdminNotFound => StatusCode::NOT_FOUND,
            AuthError::DuplicateUsername | AuthError::DuplicateEmail => StatusCode::CONFLICT,
            AuthError::LockedOut => StatusCode::TOO_MANY_REQUESTS,
            AuthError::Configuration(_) | AuthError::Database(_) | AuthError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation(_) => ErrorKind::BadRequest,
            AuthError::InvalidCredentials
            | AuthError::InvalidPassword
            | AuthError::MissingToken
            | AuthError::MissingRefreshToken
            | AuthError::TokenExpired => ErrorKind::Unauthorized,
            AuthError::InvalidToken
            | AuthError::AccountDeactivated
            | AuthError::AccountInactive
            | AuthError::Forbidden => ErrorKind::Forbidden,
            AuthError::AdminNotFound => ErrorKind::NotFound,
            AuthError::DuplicateUsername | AuthError::DuplicateEmail => ErrorKind::Conflict,
            AuthError::LockedOut => ErrorKind::TooManyRequests,
            AuthError::Configuration(_) | AuthError::Database(_) | AuthError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Stable machine-readable code for client branching
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::Validation(_) => "VALIDATION_ERROR",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::InvalidPassword => "INVALID_PASSWORD",
            AuthError::MissingToken => "NO_TOKEN",
            AuthError::MissingRefreshToken => "MISSING_TOKEN",
            AuthError::TokenExpired => "TOKEN_EXPIRED",
            AuthError::InvalidToken => "INVALID_TOKEN",
            AuthError::AccountDeactivated => "ACCOUNT_DEACTIVATED",
            AuthError::AccountInactive => "ACCOUNT_INACTIVE",
            AuthError::Forbidden => "FORBIDDEN",
            AuthError::AdminNotFound => "NOT_FOUND",
            AuthError::DuplicateUsername => "DUPLICATE_USERNAME",
            AuthError::DuplicateEmail => "DUPLICATE_EMAIL",
            AuthError::LockedOut => "RATE_LIMITED",
            AuthError::Configuration(_) => "CONFIG_ERROR",
            AuthError::Database(_) | AuthError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Message safe to serialize to clients. Server errors collapse to a
    /// generic line; full detail stays in the logs.
    fn client_message(&self) -> String {
        match self {
            AuthError::Configuration(_) => "Server configuration error".to_string(),
            AuthError::Database(_) | AuthError::Internal(_) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.client_message()).with_code(self.code())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::Configuration(msg) => {
                tracing::error!(message = %msg, "Auth configuration error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::LockedOut => {
                tracing::warn!("Login attempt from locked-out address");
            }
            AuthError::InvalidToken => {
                tracing::warn!("Invalid token presented");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Missing => AuthError::MissingToken,
            TokenError::Expired => AuthError::TokenExpired,
            TokenError::Invalid | TokenError::WrongType => AuthError::InvalidToken,
        }
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

impl From<platform::password::PasswordHashError> for AuthError {
    fn from(err: platform::password::PasswordHashError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_follow_taxonomy() {
        assert_eq!(
            AuthError::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AuthError::InvalidToken.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            AuthError::AccountDeactivated.status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AuthError::AdminNotFound.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AuthError::DuplicateUsername.status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AuthError::LockedOut.status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            AuthError::Configuration("no secret".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_detail_is_not_sent_to_clients() {
        let err = AuthError::Internal("connection string leaked".into());
        let app = err.to_app_error();
        assert_eq!(app.message(), "Internal server error");
    }

    #[test]
    fn test_config_error_has_distinct_code() {
        let err = AuthError::Configuration("JWT_SECRET missing".into());
        assert_eq!(err.code(), "CONFIG_ERROR");
        assert_ne!(err.code(), AuthError::Internal("x".into()).code());
    }

    #[test]
    fn test_token_error_mapping() {
        assert!(matches!(
            AuthError::from(TokenError::Expired),
            AuthError::TokenExpired
        ));
        assert!(matches!(
            AuthError::from(TokenError::WrongType),
            AuthError::InvalidToken
        ));
        assert!(matches!(
            AuthError::from(TokenError::Missing),
            AuthError::MissingToken
        ));
    }
}
