/*
 * Responsibility
 * - /user-groups CRUD (admin only)
 */
use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::{
    api::{
        dto::groups::{CreateGroupRequest, UpdateGroupRequest},
        envelope::success,
        extractors::{AuthCtxExtractor, PageQuery},
        handlers::ApiResult,
    },
    error::AppError,
    state::AppState,
};

fn ensure_users_exist(state: &AppState, members: &[String]) -> Result<(), AppError> {
    match members.iter().find(|id| state.users.get(id).is_none()) {
        Some(_) => Err(AppError::not_found("user")),
        None => Ok(()),
    }
}

pub async fn create_group(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Json(req): Json<CreateGroupRequest>,
) -> ApiResult {
    ctx.require_admin()?;
    req.validate().map_err(AppError::bad_request)?;
    ensure_users_exist(&state, &req.members)?;

    let group = state.groups.create(req.name.trim(), req.members)?;
    Ok(success(group))
}

pub async fn paging_groups(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Query(query): Query<PageQuery>,
) -> ApiResult {
    ctx.require_admin()?;

    let groups: Vec<_> = state
        .groups
        .list()
        .into_iter()
        .filter(|g| query.matches_name(&g.name))
        .collect();
    Ok(success(query.paginate(groups)))
}

pub async fn get_group(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(group_id): Path<String>,
) -> ApiResult {
    ctx.require_admin()?;

    let group = state
        .groups
        .get(&group_id)
        .ok_or(AppError::not_found("user group"))?;
    Ok(success(group))
}

pub async fn update_group(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(group_id): Path<String>,
    Json(req): Json<UpdateGroupRequest>,
) -> ApiResult {
    ctx.require_admin()?;
    req.validate().map_err(AppError::bad_request)?;
    if let Some(members) = &req.members {
        ensure_users_exist(&state, members)?;
    }

    let group = state
        .groups
        .update(&group_id, req.name.as_deref().map(str::trim), req.members)?;
    Ok(success(group))
}

pub async fn delete_group(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(group_id): Path<String>,
) -> ApiResult {
    ctx.require_admin()?;

    if !state.groups.delete(&group_id) {
        return Err(AppError::not_found("user group"));
    }
    Ok(success(()))
}
