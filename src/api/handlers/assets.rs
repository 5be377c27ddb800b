/*
 * Responsibility
 * - asset-only endpoints: POST /assets/{id}/tcping, GET /tags
 * - asset CRUD itself lives in `records`
 */
use std::collections::BTreeSet;
use std::time::Duration;

use axum::extract::{Path, State};
use serde_json::Value;
use tokio::net::TcpStream;

use crate::{
    api::{
        envelope::success,
        extractors::AuthCtxExtractor,
        handlers::{
            ApiResult,
            records::{AssetKind, viewable, visible},
        },
    },
    error::AppError,
    repos::record_repo::Record,
    state::AppState,
};

const TCPING_TIMEOUT: Duration = Duration::from_secs(5);

fn address_of(asset: &Record) -> Result<(String, u16), AppError> {
    let ip = asset
        .attr_str("ip")
        .filter(|ip| !ip.trim().is_empty())
        .ok_or_else(|| AppError::bad_request("asset has no ip"))?;

    // clients send the port either as a number or as a string
    let port = match asset.attrs.get("port") {
        Some(Value::Number(n)) => n.as_u64().and_then(|p| u16::try_from(p).ok()),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
    .filter(|p| *p != 0)
    .ok_or_else(|| AppError::bad_request("asset has no valid port"))?;

    Ok((ip.trim().to_string(), port))
}

/// Reachability probe: `data` is `true` when a TCP connection opens in time.
pub async fn tcping(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(id): Path<String>,
) -> ApiResult {
    let asset = viewable::<AssetKind>(&state, &ctx, &id)?;
    let (ip, port) = address_of(&asset)?;

    let reachable = matches!(
        tokio::time::timeout(TCPING_TIMEOUT, TcpStream::connect((ip.as_str(), port))).await,
        Ok(Ok(_))
    );
    tracing::debug!(asset_id = %id, %ip, port, reachable, "tcping");

    Ok(success(reachable))
}

/// Distinct tags over the caller's visible assets (`tags` is a comma-separated string).
pub async fn tags(State(state): State<AppState>, AuthCtxExtractor(ctx): AuthCtxExtractor) -> ApiResult {
    let tags: BTreeSet<String> = visible::<AssetKind>(&state, &ctx)
        .iter()
        .filter_map(|asset| asset.attr_str("tags"))
        .flat_map(|raw| raw.split(','))
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect();

    Ok(success(tags))
}
