/*
 * Responsibility
 * - Application-wide AppError
 * - IntoResponse: every variant becomes an envelope with HTTP 200
 * - Conversions from repo/cache/totp errors
 */
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::api::envelope;
use crate::repos::RepoError;
use crate::services::auth::totp::TotpError;
use crate::services::cache::CacheError;

pub const FORBIDDEN_CODE: i32 = 403;
pub const BAD_REQUEST_CODE: i32 = 400;
pub const TIMEOUT_CODE: i32 = 408;
pub const INTERNAL_CODE: i32 = 500;
pub const UNAVAILABLE_CODE: i32 = 501;

#[derive(Debug, Error)]
pub enum AppError {
    /// No live token. `code` comes from configuration.
    #[error("login expired, please sign in again")]
    Unauthenticated { code: i32 },
    #[error("permission denied")]
    Forbidden,
    #[error("{message}")]
    BadRequest { message: String },
    #[error("{resource} not found")]
    NotFound { resource: &'static str },
    #[error("{message}")]
    Fail { code: i32, message: String },
    #[error("request timed out")]
    Timeout,
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }

    pub fn fail(code: i32, message: impl Into<String>) -> Self {
        Self::Fail {
            code,
            message: message.into(),
        }
    }

    /// Capability that lives outside this service (terminal transport, file transfer).
    pub fn unavailable(what: &str) -> Self {
        Self::fail(UNAVAILABLE_CODE, format!("{what} is not available"))
    }

    pub fn code(&self) -> i32 {
        match self {
            AppError::Unauthenticated { code } => *code,
            AppError::Forbidden => FORBIDDEN_CODE,
            AppError::BadRequest { .. } => BAD_REQUEST_CODE,
            AppError::NotFound { .. } => envelope::NOT_FOUND_CODE,
            AppError::Fail { code, .. } => *code,
            AppError::Timeout => TIMEOUT_CODE,
            AppError::Internal => INTERNAL_CODE,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        envelope::fail(self.code(), self.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound(resource) => AppError::not_found(resource),
            RepoError::Conflict(message) => AppError::fail(409, message),
        }
    }
}

impl From<CacheError> for AppError {
    fn from(e: CacheError) -> Self {
        tracing::error!(error = %e, "identity cache failure");
        AppError::Internal
    }
}

impl From<TotpError> for AppError {
    fn from(e: TotpError) -> Self {
        tracing::error!(error = %e, "totp failure");
        AppError::Internal
    }
}

impl From<argon2::password_hash::Error> for AppError {
    fn from(e: argon2::password_hash::Error) -> Self {
        tracing::error!(error = %e, "password hashing failure");
        AppError::Internal
    }
}
