//! Bearer token lookup for inbound requests.
//!
//! Sources, in this order:
//! 1. `X-Auth-Token` header (header names are case-insensitive)
//! 2. `X-Auth-Token` query parameter (browsers cannot set headers on WebSocket upgrades)
//!
//! Nothing else is consulted.

use axum::http::{HeaderMap, HeaderName, Uri};

/// Logical name of the token, shared by the header and the query parameter.
pub const TOKEN_KEY: &str = "X-Auth-Token";

pub const TOKEN_HEADER: HeaderName = HeaderName::from_static("x-auth-token");

/// Returns the request token, or an empty string if there is none.
///
/// An empty header value counts as absent and falls through to the query.
pub fn resolve_token(headers: &HeaderMap, uri: &Uri) -> String {
    if let Some(value) = headers.get(&TOKEN_HEADER).and_then(|v| v.to_str().ok())
        && !value.is_empty()
    {
        return value.to_string();
    }

    uri.query()
        .and_then(|query| {
            url::form_urlencoded::parse(query.as_bytes())
                .find(|(key, _)| key == TOKEN_KEY)
                .map(|(_, value)| value.into_owned())
        })
        .unwrap_or_default()
}
