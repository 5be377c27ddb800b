/*
 * Responsibility
 * - GET /tunnel, GET /ssh (public routes)
 * - the terminal transport is not served here; when a session is named, the
 *   caller's right to it is still decided so clients get a precise answer
 */
use axum::{
    extract::{Query, State},
    http::{HeaderMap, Uri},
};

use crate::{
    api::{dto::sessions::TransportQuery, handlers::ApiResult},
    error::AppError,
    state::AppState,
};

// Browsers put the token in the query here (`?X-Auth-Token=`), hence the
// request-level lookup instead of the gate's AuthCtx.
async fn check_session_access(
    state: &AppState,
    headers: &HeaderMap,
    uri: &Uri,
    session_id: Option<&str>,
) -> Result<(), AppError> {
    let Some(session_id) = session_id else {
        return Ok(());
    };

    let owner = state.sessions.owner_of(session_id)?;
    if !state.auth.has_permission(headers, uri, &owner).await {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

pub async fn tunnel(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
    Query(query): Query<TransportQuery>,
) -> ApiResult {
    check_session_access(&state, &headers, &uri, query.session_id.as_deref()).await?;
    Err(AppError::unavailable("tunnel transport"))
}

pub async fn ssh(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
    Query(query): Query<TransportQuery>,
) -> ApiResult {
    check_session_access(&state, &headers, &uri, query.session_id.as_deref()).await?;
    Err(AppError::unavailable("ssh transport"))
}
