use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;

use crate::services::auth::types::Authorization;
use crate::services::cache::client::{CacheResult, IdentityCache};

#[derive(Debug, Clone)]
struct Entry {
    authorization: Authorization,
    expires_at: Instant,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at > now
    }
}

/// In-process identity cache.
///
/// Reads never block each other (sharded map); expired entries are dropped
/// lazily on lookup and in bulk by `purge_expired`.
#[derive(Debug, Default)]
pub struct MemoryIdentityCache {
    entries: DashMap<String, Entry>,
}

impl MemoryIdentityCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_live(now));
        before.saturating_sub(self.entries.len())
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[async_trait]
impl IdentityCache for MemoryIdentityCache {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, token: &str) -> CacheResult<Option<Authorization>> {
        let now = Instant::now();
        {
            // the shard guard must be released before `remove_if` below
            let Some(entry) = self.entries.get(token) else {
                return Ok(None);
            };
            if entry.is_live(now) {
                return Ok(Some(entry.authorization.clone()));
            }
        }

        self.entries.remove_if(token, |_, entry| !entry.is_live(now));
        Ok(None)
    }

    async fn set(
        &self,
        token: &str,
        authorization: &Authorization,
        ttl: Duration,
    ) -> CacheResult<()> {
        self.entries.insert(
            token.to_string(),
            Entry {
                authorization: authorization.clone(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn delete(&self, token: &str) -> CacheResult<bool> {
        Ok(self.entries.remove(token).is_some())
    }
}
