//! Cache construction from declarative configuration.
//!
//! The single entry point is [`make_cache`]; [`make_cache_from_value`] is the
//! JSON front door. Construction recurses for `multi`, so a tier may itself
//! be a split Redis pair or another multi-tier composition.

use std::sync::Arc;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use tracing::{info, warn};

use crate::Cache;
use crate::backends::redis::apply_config_directives;
use crate::backends::{MemcachedCache, MemoryCache, RedisCache};
use crate::config::{CacheConfig, HostRouting, MultiConfig, RedisConfig};
use crate::error::{CacheError, CacheResult};
use crate::multi_tier::MultiTierCache;

/// Build a cache handle from configuration.
///
/// `CacheConfig::default()` selects the in-process memory backend, covering
/// callers that supply no configuration of their own. Construction-time
/// errors (unreachable backend, invalid composition) propagate to the
/// caller; the Redis bootstrap step does not (see [`RedisConfig::configure`]).
pub async fn make_cache(config: CacheConfig) -> CacheResult<Cache> {
    match config {
        CacheConfig::Memory(config) => Ok(Cache::from_driver(Arc::new(MemoryCache::new(&config)))),
        CacheConfig::Redis(config) => make_redis_cache(config).await,
        CacheConfig::Memcached(config) => {
            Ok(Cache::from_driver(Arc::new(MemcachedCache::connect(&config)?)))
        }
        CacheConfig::Multi(config) => make_multi_cache(config).await,
    }
}

/// Build a cache handle from a JSON configuration.
///
/// Fails fast with [`CacheError::UnknownBackendType`] when the `type` field
/// names no registered backend.
pub async fn make_cache_from_value(value: serde_json::Value) -> CacheResult<Cache> {
    make_cache(CacheConfig::from_value(value)?).await
}

async fn make_redis_cache(config: RedisConfig) -> CacheResult<Cache> {
    // Fire-and-forget: server-side directives are applied on a detached
    // bootstrap task whose outcome is only ever logged. Handle construction
    // proceeds without awaiting it.
    if !config.configure.is_empty() {
        spawn_bootstrap(config.clone());
    }

    match config.routing() {
        HostRouting::Split { read, write } => {
            let read_cache =
                Cache::from_driver(Arc::new(RedisCache::connect(&config, Some(read)).await?));
            let write_cache =
                Cache::from_driver(Arc::new(RedisCache::connect(&config, Some(write)).await?));
            info!(read = %read, write = %write, "built split-endpoint redis cache");
            Ok(Cache::split(read_cache, write_cache))
        }
        HostRouting::Single(host) => {
            let driver = RedisCache::connect(&config, Some(host)).await?;
            Ok(Cache::from_driver(Arc::new(driver)))
        }
    }
}

fn spawn_bootstrap(config: RedisConfig) {
    tokio::spawn(async move {
        match apply_config_directives(&config).await {
            Ok(()) => {
                info!(
                    host = %config.host,
                    directives = config.configure.len(),
                    "redis bootstrap configuration applied"
                );
            }
            Err(error) => {
                warn!(host = %config.host, %error, "redis bootstrap configuration rejected");
            }
        }
    });
}

// Returns an explicitly boxed `Send` future so the recursive `make_cache`
// call below can be `.boxed()` — the explicit return type breaks the
// otherwise-cyclic `Send` inference between `make_cache` and this helper.
fn make_multi_cache(config: MultiConfig) -> BoxFuture<'static, CacheResult<Cache>> {
    async move {
        if config.stores.is_empty() {
            return Err(CacheError::InvalidConfig(
                "multi cache requires at least one store".to_string(),
            ));
        }

        let mut tiers = Vec::with_capacity(config.stores.len());
        for store in config.stores {
            // Boxed to allow multi-in-multi recursion.
            tiers.push(make_cache(store).boxed().await?);
        }

        Ok(Cache::from_driver(Arc::new(MultiTierCache::new(tiers))))
    }
    .boxed()
}
