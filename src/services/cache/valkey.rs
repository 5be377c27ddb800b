use std::time::Duration;

use async_trait::async_trait;

use crate::services::auth::types::Authorization;
use crate::services::cache::client::{CacheError, CacheResult, IdentityCache};

/// Valkey/Redis-backed identity cache.
///
/// Values are JSON-encoded `Authorization`s stored with `SET .. EX`, so expiry
/// is enforced by the server.
#[derive(Clone)]
pub struct ValkeyIdentityCache {
    manager: redis::aio::ConnectionManager,
    // Key prefix to avoid collisions with other tenants of the same server
    prefix: String,
}

impl ValkeyIdentityCache {
    // Create a client from a URL like `redis://localhost:6379`
    pub async fn new(url: &str) -> Result<Self, CacheError> {
        Self::new_with_prefix(url, "auth:token").await
    }

    pub async fn new_with_prefix(url: &str, prefix: impl Into<String>) -> Result<Self, CacheError> {
        let client =
            redis::Client::open(url).map_err(|e| CacheError::BackendConnection(e.to_string()))?;

        let manager = client
            .get_connection_manager()
            .await
            .map_err(|e| CacheError::BackendConnection(e.to_string()))?;

        Ok(Self {
            manager,
            prefix: prefix.into(),
        })
    }

    fn key(&self, token: &str) -> String {
        format!("{}:{}", self.prefix, token)
    }
}

#[async_trait]
impl IdentityCache for ValkeyIdentityCache {
    fn backend_name(&self) -> &'static str {
        "valkey"
    }

    async fn get(&self, token: &str) -> CacheResult<Option<Authorization>> {
        let mut conn = self.manager.clone();

        let resp: Option<String> = redis::cmd("GET")
            .arg(self.key(token))
            .query_async(&mut conn)
            .await
            .map_err(|e| CacheError::BackendCommand(e.to_string()))?;

        resp.map(|raw| {
            serde_json::from_str(&raw).map_err(|e| CacheError::InvalidValue(e.to_string()))
        })
        .transpose()
    }

    async fn set(
        &self,
        token: &str,
        authorization: &Authorization,
        ttl: Duration,
    ) -> CacheResult<()> {
        let mut conn = self.manager.clone();

        let value = serde_json::to_string(authorization)
            .map_err(|e| CacheError::InvalidValue(e.to_string()))?;

        // EX expects integer seconds. We clamp to at least 1 sec.
        let ttl_seconds: u64 = ttl.as_secs().max(1);

        let _: () = redis::cmd("SET")
            .arg(self.key(token))
            .arg(value)
            .arg("EX")
            .arg(ttl_seconds)
            .query_async(&mut conn)
            .await
            .map_err(|e| CacheError::BackendCommand(e.to_string()))?;

        Ok(())
    }

    async fn delete(&self, token: &str) -> CacheResult<bool> {
        let mut conn = self.manager.clone();

        let n: u64 = redis::cmd("DEL")
            .arg(self.key(token))
            .query_async(&mut conn)
            .await
            .map_err(|e| CacheError::BackendCommand(e.to_string()))?;

        Ok(n > 0)
    }
}
