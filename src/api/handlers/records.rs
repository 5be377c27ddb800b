/*
 * Responsibility
 * - ownable CRUD shared by /assets, /credentials, /commands
 * - the record kind is a type parameter (`OwnedKind`), one handler set for all three
 *
 * Access
 * - read: owner, users the record is shared with, admins
 * - write / delete / change-owner: `has_permission(owner)` only
 */
use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::{
    api::{
        dto::records::{ChangeOwnerQuery, CreateRecordRequest, UpdateRecordRequest},
        envelope::success,
        extractors::{AuthCtx, AuthCtxExtractor, PageQuery},
        handlers::ApiResult,
    },
    error::AppError,
    repos::record_repo::{Record, RecordRepo},
    state::AppState,
};

/// Selects the repository a handler instance works on.
pub trait OwnedKind: Send + Sync + 'static {
    fn repo(state: &AppState) -> &RecordRepo;

    /// Fields left out of list/paging responses (still returned by GET /{id}).
    const HIDDEN_IN_LISTS: &'static [&'static str] = &[];
}

pub enum AssetKind {}
pub enum CredentialKind {}
pub enum CommandKind {}

impl OwnedKind for AssetKind {
    fn repo(state: &AppState) -> &RecordRepo {
        &state.assets
    }
}

impl OwnedKind for CredentialKind {
    fn repo(state: &AppState) -> &RecordRepo {
        &state.credentials
    }

    const HIDDEN_IN_LISTS: &'static [&'static str] = &["password", "privateKey", "passphrase"];
}

impl OwnedKind for CommandKind {
    fn repo(state: &AppState) -> &RecordRepo {
        &state.commands
    }
}

pub fn can_view(state: &AppState, ctx: &AuthCtx, record: &Record) -> bool {
    ctx.has_permission(&record.owner) || state.shares.is_shared_with(&record.id, ctx.user_id())
}

/// Records of kind `K` the caller may see, newest first.
pub fn visible<K: OwnedKind>(state: &AppState, ctx: &AuthCtx) -> Vec<Record> {
    K::repo(state).list_where(|r| can_view(state, ctx, r))
}

/// Fetch a record the caller may see.
pub fn viewable<K: OwnedKind>(state: &AppState, ctx: &AuthCtx, id: &str) -> Result<Record, AppError> {
    let repo = K::repo(state);
    let record = repo.get(id).ok_or(AppError::not_found(repo.resource()))?;
    if !can_view(state, ctx, &record) {
        return Err(AppError::Forbidden);
    }
    Ok(record)
}

fn for_listing<K: OwnedKind>(mut record: Record) -> Record {
    for key in K::HIDDEN_IN_LISTS {
        record.attrs.remove(*key);
    }
    record
}

pub async fn all<K: OwnedKind>(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> ApiResult {
    let records: Vec<Record> = visible::<K>(&state, &ctx)
        .into_iter()
        .map(for_listing::<K>)
        .collect();
    Ok(success(records))
}

pub async fn paging<K: OwnedKind>(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Query(query): Query<PageQuery>,
) -> ApiResult {
    let records: Vec<Record> = visible::<K>(&state, &ctx)
        .into_iter()
        .filter(|r| query.matches_name(&r.name))
        .map(for_listing::<K>)
        .collect();
    Ok(success(query.paginate(records)))
}

pub async fn create<K: OwnedKind>(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Json(req): Json<CreateRecordRequest>,
) -> ApiResult {
    req.validate().map_err(AppError::bad_request)?;

    let repo = K::repo(&state);
    let record = repo.create(ctx.user_id(), req.name.trim(), req.attrs);
    tracing::info!(resource = repo.resource(), id = %record.id, owner = %record.owner, "created");

    Ok(success(record))
}

pub async fn get<K: OwnedKind>(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(id): Path<String>,
) -> ApiResult {
    Ok(success(viewable::<K>(&state, &ctx, &id)?))
}

pub async fn update<K: OwnedKind>(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(id): Path<String>,
    Json(req): Json<UpdateRecordRequest>,
) -> ApiResult {
    req.validate().map_err(AppError::bad_request)?;

    let repo = K::repo(&state);
    ctx.require_owner(&repo.owner_of(&id)?)?;

    let record = repo.update(&id, req.name.as_deref().map(str::trim), req.attrs)?;
    Ok(success(record))
}

pub async fn delete<K: OwnedKind>(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(id): Path<String>,
) -> ApiResult {
    let repo = K::repo(&state);
    ctx.require_owner(&repo.owner_of(&id)?)?;

    repo.delete(&id);
    state.shares.forget_resource(&id);
    tracing::info!(resource = repo.resource(), %id, by = %ctx.user_id(), "deleted");

    Ok(success(()))
}

pub async fn change_owner<K: OwnedKind>(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(id): Path<String>,
    Query(query): Query<ChangeOwnerQuery>,
) -> ApiResult {
    let repo = K::repo(&state);
    ctx.require_owner(&repo.owner_of(&id)?)?;

    if state.users.get(&query.owner).is_none() {
        return Err(AppError::not_found("user"));
    }

    let record = repo.change_owner(&id, &query.owner)?;
    Ok(success(record))
}
