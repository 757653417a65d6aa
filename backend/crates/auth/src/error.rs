//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// User not found (admin operations only; never surfaced on login)
    #[error("User not found")]
    UserNotFound,

    /// Email already registered
    #[error("An account with this email already exists")]
    EmailTaken,

    /// Invalid credentials
    ///
    /// Covers nonexistent email, wrong password AND disabled accounts.
    /// The client-visible message must not distinguish between them.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Session not found, expired or revoked
    #[error("Session not found or expired")]
    SessionInvalid,

    /// Valid session but insufficient role
    #[error("Insufficient permissions")]
    InsufficientRole,

    /// Too many attempts
    #[error("Too many attempts, please try again later")]
    RateLimitExceeded,

    /// Would remove the last active admin
    #[error("Cannot remove the last active administrator")]
    LastAdmin,

    /// Admin targeting their own account for role/status changes
    #[error("Administrators cannot modify their own role or status")]
    SelfTarget,

    /// Input validation error
    #[error("Validation failed: {0}")]
    Validation(String),

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
            AuthError::UserNotFound => StatusCode::NOT_FOUND,
            AuthError::EmailTaken => StatusCode::CONFLICT,
            AuthError::InvalidCredentials | AuthError::SessionInvalid => StatusCode::UNAUTHORIZED,
            AuthError::InsufficientRole => StatusCode::FORBIDDEN,
            AuthError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            AuthError::LastAdmin | AuthError::SelfTarget => StatusCode::UNPROCESSABLE_ENTITY,
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::Database(_) | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::EmailTaken => ErrorKind::Conflict,
            AuthError::InvalidCredentials | AuthError::SessionInvalid => ErrorKind::Unauthorized,
            AuthError::InsufficientRole => ErrorKind::Forbidden,
            AuthError::RateLimitExceeded => ErrorKind::TooManyRequests,
            AuthError::LastAdmin | AuthError::SelfTarget => ErrorKind::UnprocessableEntity,
            AuthError::Validation(_) => ErrorKind::BadRequest,
            AuthError::Database(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
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
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::RateLimitExceeded => {
                tracing::warn!("Rate limit exceeded");
            }
            AuthError::InsufficientRole => {
                tracing::warn!("Access attempt with insufficient role");
            }
            AuthError::LastAdmin => {
                tracing::warn!("Attempt to remove the last active admin");
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

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        AuthError::Internal(err.to_string())
    }
}
