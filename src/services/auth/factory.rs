/// Factory: build `AuthService` (and its identity cache) from application `Config`.
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::repos::user_repo::UserRepo;
use crate::services::auth::AuthService;
use crate::services::cache::{CacheError, IdentityCache, MemoryIdentityCache, ValkeyIdentityCache};

const PURGE_INTERVAL: Duration = Duration::from_secs(60);

pub async fn build_auth_service(
    config: &Config,
    users: Arc<UserRepo>,
) -> Result<Arc<AuthService>, CacheError> {
    let cache: Arc<dyn IdentityCache> = match &config.identity_cache_url {
        Some(url) => Arc::new(ValkeyIdentityCache::new(url).await?),
        None => {
            let memory = Arc::new(MemoryIdentityCache::new());
            spawn_purger(memory.clone());
            memory
        }
    };

    let service = AuthService::new(cache, users, config.token_ttl, config.remember_ttl);
    tracing::info!(backend = service.backend_name(), "identity cache ready");

    Ok(Arc::new(service))
}

// Valkey expires keys itself; the in-process map needs a sweeper.
fn spawn_purger(cache: Arc<MemoryIdentityCache>) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(PURGE_INTERVAL);
        loop {
            ticker.tick().await;
            let purged = cache.purge_expired();
            if purged > 0 {
                tracing::debug!(purged, "expired authorizations purged");
            }
        }
    });
}
