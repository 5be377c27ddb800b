//! Authentication gate: X-Auth-Token → identity cache → AuthCtx in extensions.
//!
//! - Public paths (see `classifier`) pass through untouched.
//! - Protected paths without a live token are rejected here; the handler never runs.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::api::extractors::AuthCtx;
use crate::error::AppError;
use crate::middleware::auth::classifier::{RouteClass, classify};
use crate::services::auth::token::resolve_token;
use crate::state::AppState;

/// Put the gate in front of every route of `router` (fallback included).
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    if classify(req.uri().path()) == RouteClass::Public {
        return Ok(next.run(req).await);
    }

    let token = resolve_token(req.headers(), req.uri());

    let Some(user) = state.auth.identity_for(&token).await else {
        tracing::warn!(
            method = %req.method(),
            path = %req.uri().path(),
            has_token = !token.is_empty(),
            "request rejected: no live authorization"
        );
        return Err(AppError::Unauthenticated {
            code: state.reject_code,
        });
    };

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(AuthCtx::new(token, user));

    Ok(next.run(req).await)
}
