/*
 * Responsibility
 * - /users 系 CRUD handler (admin only)
 */
use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::{
    api::{
        dto::users::{CreateUserRequest, UpdateUserRequest},
        envelope::success,
        extractors::{AuthCtxExtractor, PageQuery},
        handlers::ApiResult,
    },
    error::{AppError, BAD_REQUEST_CODE},
    repos::user_repo::NewUser,
    services::auth::{password, types::UserType},
    state::AppState,
};

pub async fn create_user(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult {
    ctx.require_admin()?;
    req.validate().map_err(AppError::bad_request)?;

    let username = req.username.trim();
    let user = state.users.create(NewUser {
        username,
        nickname: req.nickname.as_deref().unwrap_or(username),
        password_hash: password::hash_password(&req.password)?,
        user_type: req.user_type.unwrap_or(UserType::Standard),
    })?;
    tracing::info!(user_id = %user.id, by = %ctx.user_id(), "user created");

    Ok(success(user))
}

pub async fn paging_users(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Query(query): Query<PageQuery>,
) -> ApiResult {
    ctx.require_admin()?;

    let users: Vec<_> = state
        .users
        .list()
        .into_iter()
        .filter(|u| query.matches_name(&u.username) || query.matches_name(&u.nickname))
        .collect();

    Ok(success(query.paginate(users)))
}

pub async fn get_user(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(user_id): Path<String>,
) -> ApiResult {
    ctx.require_admin()?;

    let user = state
        .users
        .get(&user_id)
        .ok_or(AppError::not_found("user"))?;
    Ok(success(user))
}

pub async fn update_user(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(user_id): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult {
    ctx.require_admin()?;
    req.validate().map_err(AppError::bad_request)?;

    let user = state
        .users
        .update(&user_id, req.nickname.as_deref(), req.user_type)?;
    Ok(success(user))
}

pub async fn delete_user(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(user_id): Path<String>,
) -> ApiResult {
    ctx.require_admin()?;
    if user_id == ctx.user_id() {
        return Err(AppError::fail(
            BAD_REQUEST_CODE,
            "the signed-in account cannot be deleted",
        ));
    }

    if !state.users.delete(&user_id) {
        return Err(AppError::not_found("user"));
    }
    state.groups.remove_member(&user_id);
    state.shares.forget_user(&user_id);
    tracing::info!(%user_id, by = %ctx.user_id(), "user deleted");

    Ok(success(()))
}
