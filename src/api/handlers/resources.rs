/*
 * Responsibility
 * - /resources: share assets / credentials / commands with other users (admin only)
 */
use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    api::{
        dto::resources::{AssignRequest, ShareRequest},
        envelope::success,
        extractors::AuthCtxExtractor,
        handlers::ApiResult,
    },
    error::AppError,
    state::AppState,
};

fn ensure_user(state: &AppState, user_id: &str) -> Result<(), AppError> {
    state
        .users
        .get(user_id)
        .map(|_| ())
        .ok_or(AppError::not_found("user"))
}

/// `GET /resources/{id}/assign`: user ids the resource is shared with.
pub async fn get_assign(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(resource_id): Path<String>,
) -> ApiResult {
    ctx.require_admin()?;
    Ok(success(state.shares.users_of(&resource_id)))
}

pub async fn overwrite_assign(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(resource_id): Path<String>,
    Json(req): Json<AssignRequest>,
) -> ApiResult {
    ctx.require_admin()?;
    for user_id in &req.user_ids {
        ensure_user(&state, user_id)?;
    }

    state.shares.overwrite(&resource_id, req.user_ids);
    Ok(success(()))
}

pub async fn add_by_user(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Json(req): Json<ShareRequest>,
) -> ApiResult {
    ctx.require_admin()?;
    ensure_user(&state, &req.user_id)?;

    state.shares.add(&req.user_id, &req.resource_ids);
    Ok(success(()))
}

pub async fn remove_by_user(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Json(req): Json<ShareRequest>,
) -> ApiResult {
    ctx.require_admin()?;

    state.shares.remove(&req.user_id, &req.resource_ids);
    Ok(success(()))
}
