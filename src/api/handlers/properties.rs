/*
 * Responsibility
 * - GET /properties (any signed-in user), PUT /properties (admin, merge)
 */
use std::collections::BTreeMap;

use axum::{Json, extract::State};

use crate::{
    api::{envelope::success, extractors::AuthCtxExtractor, handlers::ApiResult},
    state::AppState,
};

pub async fn get_properties(
    State(state): State<AppState>,
    AuthCtxExtractor(_ctx): AuthCtxExtractor,
) -> ApiResult {
    Ok(success(state.properties.all()))
}

pub async fn update_properties(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Json(incoming): Json<BTreeMap<String, String>>,
) -> ApiResult {
    ctx.require_admin()?;

    let keys = incoming.len();
    state.properties.merge(incoming);
    tracing::info!(keys, by = %ctx.user_id(), "properties updated");

    Ok(success(()))
}
