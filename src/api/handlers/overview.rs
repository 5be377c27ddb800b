/*
 * Responsibility
 * - dashboard counters, scoped to what the caller can see
 */
use axum::extract::State;
use chrono::Utc;
use serde::Serialize;

use crate::{
    api::{
        envelope::success,
        extractors::AuthCtxExtractor,
        handlers::{
            ApiResult,
            records::{AssetKind, CredentialKind, visible},
        },
    },
    state::AppState,
};

const SESSION_HISTORY_DAYS: i64 = 7;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Counter {
    pub user: usize,
    pub asset: usize,
    pub credential: usize,
    pub online_session: usize,
}

#[derive(Debug, Serialize)]
pub struct DailyCount {
    pub day: String,
    pub count: usize,
}

pub async fn counter(State(state): State<AppState>, AuthCtxExtractor(ctx): AuthCtxExtractor) -> ApiResult {
    let user = if ctx.is_admin() { state.users.count() } else { 1 };

    Ok(success(Counter {
        user,
        asset: visible::<AssetKind>(&state, &ctx).len(),
        credential: visible::<CredentialKind>(&state, &ctx).len(),
        online_session: state.sessions.count_online(|s| ctx.has_permission(&s.owner)),
    }))
}

/// Sessions opened per day over the last week, oldest first.
pub async fn sessions(State(state): State<AppState>, AuthCtxExtractor(ctx): AuthCtxExtractor) -> ApiResult {
    let today = Utc::now().date_naive();
    let days: Vec<DailyCount> = state
        .sessions
        .created_per_day(today, SESSION_HISTORY_DAYS, |s| ctx.has_permission(&s.owner))
        .into_iter()
        .map(|(day, count)| DailyCount {
            day: day.format("%Y-%m-%d").to_string(),
            count,
        })
        .collect();

    Ok(success(days))
}
