/*
 * Responsibility
 * - /sessions bookkeeping: create, paging, get, delete, status, resize
 * - file transfer and recording routes: ownership check, then "not available"
 *   (the transport is handled outside this service)
 */
use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::{
    api::{
        dto::sessions::{CreateSessionRequest, DEFAULT_HEIGHT, DEFAULT_WIDTH, ResizeQuery},
        envelope::success,
        extractors::{AuthCtx, AuthCtxExtractor, PageQuery},
        handlers::{
            ApiResult,
            records::{AssetKind, viewable},
        },
    },
    error::AppError,
    repos::session_repo::SessionStatus,
    state::AppState,
};

fn require_session_owner(state: &AppState, ctx: &AuthCtx, id: &str) -> Result<(), AppError> {
    ctx.require_owner(&state.sessions.owner_of(id)?)
}

pub async fn create_session(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Json(req): Json<CreateSessionRequest>,
) -> ApiResult {
    let asset = viewable::<AssetKind>(&state, &ctx, &req.asset_id)?;

    let session = state.sessions.create(
        ctx.user_id(),
        &asset.id,
        req.width.unwrap_or(DEFAULT_WIDTH),
        req.height.unwrap_or(DEFAULT_HEIGHT),
    );
    tracing::info!(session_id = %session.id, asset_id = %asset.id, owner = %session.owner, "session created");

    Ok(success(session))
}

pub async fn paging_sessions(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Query(query): Query<PageQuery>,
) -> ApiResult {
    let sessions = state
        .sessions
        .list_where(|s| ctx.has_permission(&s.owner));
    Ok(success(query.paginate(sessions)))
}

pub async fn get_session(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(id): Path<String>,
) -> ApiResult {
    let session = state
        .sessions
        .get(&id)
        .ok_or(AppError::not_found("session"))?;
    ctx.require_owner(&session.owner)?;

    Ok(success(session))
}

pub async fn delete_session(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(id): Path<String>,
) -> ApiResult {
    require_session_owner(&state, &ctx, &id)?;

    state.sessions.delete(&id);
    Ok(success(()))
}

/// `POST /sessions/{id}/content`: the terminal is attached.
pub async fn connect_session(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(id): Path<String>,
) -> ApiResult {
    require_session_owner(&state, &ctx, &id)?;

    let session = state.sessions.set_status(&id, SessionStatus::Connected)?;
    Ok(success(session))
}

/// `POST /sessions/{id}/discontent`: the terminal is gone.
pub async fn disconnect_session(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(id): Path<String>,
) -> ApiResult {
    require_session_owner(&state, &ctx, &id)?;

    let session = state.sessions.set_status(&id, SessionStatus::Disconnected)?;
    tracing::info!(session_id = %id, "session disconnected");
    Ok(success(session))
}

pub async fn resize_session(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(id): Path<String>,
    Query(query): Query<ResizeQuery>,
) -> ApiResult {
    query.validate().map_err(AppError::bad_request)?;
    require_session_owner(&state, &ctx, &id)?;

    let session = state.sessions.resize(&id, query.width, query.height)?;
    Ok(success(session))
}

/// upload / download / ls / mkdir / rmdir / rm
pub async fn file_operation(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(id): Path<String>,
) -> ApiResult {
    require_session_owner(&state, &ctx, &id)?;
    Err(AppError::unavailable("session file transfer"))
}

pub async fn recording(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(id): Path<String>,
) -> ApiResult {
    require_session_owner(&state, &ctx, &id)?;
    Err(AppError::unavailable("session recording"))
}
