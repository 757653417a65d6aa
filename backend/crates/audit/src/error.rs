//! Audit Error Types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Audit-specific result type alias
pub type AuditResult<T> = Result<T, AuditError>;

/// Audit-specific error variants
#[derive(Debug, Error)]
pub enum AuditError {
    /// Incident not found
    #[error("Incident not found")]
    IncidentNotFound,

    /// Incident status may only move forward
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

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

impl AuditError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuditError::IncidentNotFound => StatusCode::NOT_FOUND,
            AuditError::InvalidTransition { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AuditError::Validation(_) => StatusCode::BAD_REQUEST,
            AuditError::Database(_) | AuditError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuditError::IncidentNotFound => ErrorKind::NotFound,
            AuditError::InvalidTransition { .. } => ErrorKind::UnprocessableEntity,
            AuditError::Validation(_) => ErrorKind::BadRequest,
            AuditError::Database(_) | AuditError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    fn log(&self) {
        match self {
            AuditError::Database(e) => {
                tracing::error!(error = %e, "Audit database error");
            }
            AuditError::Internal(msg) => {
                tracing::error!(message = %msg, "Audit internal error");
            }
            _ => {
                tracing::debug!(error = %self, "Audit error");
            }
        }
    }
}

impl IntoResponse for AuditError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}
