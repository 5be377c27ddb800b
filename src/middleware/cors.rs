//! CORS policy for the web console.
//!
//! Policy:
//! - Allow-Origin: * (no credentials; the token travels in `X-Auth-Token`, not cookies)
//! - Methods: GET, HEAD, PUT, PATCH, POST, DELETE
//!
//! Applied as the outermost layer so every response carries the headers,
//! timeouts and contained panics included.

use axum::Router;
use axum::http::{HeaderName, Method, header};
use tower_http::cors::{Any, CorsLayer};

use crate::services::auth::token::TOKEN_HEADER;

pub fn layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            TOKEN_HEADER,
            HeaderName::from_static("x-request-id"),
        ])
        .max_age(std::time::Duration::from_secs(60 * 10))
}

/// Apply CORS policy to the given Router.
///
/// IMPORTANT:
/// - Do not combine wildcard origin (`Any`) with `allow_credentials(true)`.
pub fn apply(router: Router) -> Router {
    router.layer(layer())
}
