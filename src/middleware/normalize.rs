//! Error normalization.
//!
//! Anything below this layer that still answers with a 4xx/5xx status
//! (extractor rejections, 405s, static-file misses, body limit) is rewritten
//! into an envelope: 404 → NotFound, everything else → Fail with the status as code.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
    middleware::{self, Next},
    response::Response,
};

use crate::api::envelope;
use crate::state::AppState;

// Rejection bodies are short plain-text messages.
const MAX_MESSAGE_BYTES: usize = 16 * 1024;

pub fn apply(router: Router<AppState>) -> Router<AppState> {
    router.layer(middleware::from_fn(normalize_errors))
}

async fn normalize_errors(req: Request<Body>, next: Next) -> Response {
    let response = next.run(req).await;

    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let message = match axum::body::to_bytes(response.into_body(), MAX_MESSAGE_BYTES).await {
        Ok(bytes) if !bytes.trim_ascii().is_empty() => {
            String::from_utf8_lossy(bytes.trim_ascii()).into_owned()
        }
        _ => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    };

    tracing::debug!(status = status.as_u16(), %message, "normalized error response");

    if status == StatusCode::NOT_FOUND {
        envelope::not_found(message)
    } else {
        envelope::fail(i32::from(status.as_u16()), message)
    }
}
