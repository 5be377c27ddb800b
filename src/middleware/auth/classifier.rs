//! Public/protected split of the HTTP surface.
//!
//! Only the paths below are servable without a token. Everything else,
//! including paths no route matches, goes through the authentication gate.

/// Paths served without authentication (exact match).
pub const PUBLIC_PATHS: [&str; 7] = [
    "/",
    "/logo.svg",
    "/favicon.ico",
    "/login",
    "/loginWithTotp",
    "/tunnel",
    "/ssh",
];

/// Static bundle mount; the mount itself and everything below it is public.
pub const STATIC_PREFIX: &str = "/static";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    Public,
    Protected,
}

pub fn classify(path: &str) -> RouteClass {
    let is_static = path
        .strip_prefix(STATIC_PREFIX)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'));

    if is_static || PUBLIC_PATHS.contains(&path) {
        RouteClass::Public
    } else {
        RouteClass::Protected
    }
}
