//! Identity cache interface: token -> `Authorization`.
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::services::auth::types::Authorization;

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Cache-layer errors (transport/command/serialization).
///
/// Kept independent from `AppError` so callers decide how to fail
/// (the gateway fails closed, login reports an internal error).
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache connection error: {0}")]
    BackendConnection(String),
    #[error("cache command error: {0}")]
    BackendCommand(String),
    #[error("cache value error: {0}")]
    InvalidValue(String),
}

/// Shared store of live authorizations, keyed by token.
///
/// Implementations synchronize internally and own their expiry policy.
/// The gateway only ever calls `get`; login/logout flows call `set`/`delete`.
#[async_trait]
pub trait IdentityCache: Send + Sync + 'static {
    // Returns the cache backend name (for logging).
    fn backend_name(&self) -> &'static str;

    // Live authorization for `token`, or `None` on miss/expiry.
    async fn get(&self, token: &str) -> CacheResult<Option<Authorization>>;

    // Store (or replace) the authorization for `token` with TTL.
    async fn set(&self, token: &str, authorization: &Authorization, ttl: Duration)
    -> CacheResult<()>;

    // Remove `token`. Returns whether an entry existed.
    async fn delete(&self, token: &str) -> CacheResult<bool>;
}
