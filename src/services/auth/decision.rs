//! Authorization decision: token -> identity -> ownership verdict.
//!
//! The cache is injected, so this service holds no global state and can be
//! exercised with any `IdentityCache`. A cached authorization only names the
//! account; role and existence are read from the user repository on every
//! lookup.

use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderMap, Uri};

use crate::repos::user_repo::UserRepo;
use crate::services::auth::token::resolve_token;
use crate::services::auth::types::{Authorization, User, UserType};
use crate::services::cache::{CacheError, IdentityCache};

/// Ownership rule: admins pass every check; everyone else only for their own
/// resources. Comparison is exact and case-sensitive.
pub fn permits(user: &User, owner: &str) -> bool {
    match user.user_type {
        UserType::Admin => true,
        UserType::Standard => owner == user.id,
    }
}

pub struct AuthService {
    cache: Arc<dyn IdentityCache>,
    users: Arc<UserRepo>,
    token_ttl: Duration,
    remember_ttl: Duration,
}

impl AuthService {
    pub fn new(
        cache: Arc<dyn IdentityCache>,
        users: Arc<UserRepo>,
        token_ttl: Duration,
        remember_ttl: Duration,
    ) -> Self {
        Self {
            cache,
            users,
            token_ttl,
            remember_ttl,
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.cache.backend_name()
    }

    /// Identity of the request's caller, if any.
    pub async fn current_identity(&self, headers: &HeaderMap, uri: &Uri) -> Option<User> {
        let token = resolve_token(headers, uri);
        self.identity_for(&token).await
    }

    /// Identity bound to `token`. An empty token never reaches the cache.
    ///
    /// Backend failures are logged and count as "no identity" (fail closed).
    /// A token whose account was deleted resolves to nothing; a demoted or
    /// promoted account answers with its current role.
    pub async fn identity_for(&self, token: &str) -> Option<User> {
        if token.is_empty() {
            return None;
        }

        match self.cache.get(token).await {
            Ok(found) => {
                let cached = found?.user;
                let current = self.users.get(&cached.id);
                if current.is_none() {
                    tracing::info!(user_id = %cached.id, "token refers to a deleted account");
                }
                current
            }
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    backend = self.cache.backend_name(),
                    "identity cache lookup failed"
                );
                None
            }
        }
    }

    /// Whether the request's caller may act on a resource owned by `owner`.
    pub async fn has_permission(&self, headers: &HeaderMap, uri: &Uri, owner: &str) -> bool {
        self.current_identity(headers, uri)
            .await
            .is_some_and(|user| permits(&user, owner))
    }

    /// Create a fresh token for `user` and store its authorization.
    pub async fn issue(&self, user: User, remember: bool) -> Result<Authorization, CacheError> {
        let token = uuid::Uuid::new_v4().simple().to_string();
        let ttl = if remember {
            self.remember_ttl
        } else {
            self.token_ttl
        };

        let authorization = Authorization {
            token: token.clone(),
            remember,
            user,
        };
        self.cache.set(&token, &authorization, ttl).await?;

        Ok(authorization)
    }

    pub async fn revoke(&self, token: &str) -> Result<bool, CacheError> {
        if token.is_empty() {
            return Ok(false);
        }
        self.cache.delete(token).await
    }
}
