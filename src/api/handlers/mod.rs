/*
 * Responsibility
 * - handlers behind the route table
 * - each returns an envelope (`Ok`) or an `AppError` that renders as one
 */
use axum::response::Response;

use crate::error::AppError;

pub mod account;
pub mod assets;
pub mod overview;
pub mod properties;
pub mod records;
pub mod resources;
pub mod sessions;
pub mod transport;
pub mod user_groups;
pub mod users;

pub type ApiResult = Result<Response, AppError>;

/// Unmatched routes (reached only after the authentication gate).
pub async fn fallback() -> AppError {
    AppError::not_found("route")
}
