//! Memcached backend.
//!
//! The memcache client is synchronous; its calls are fast enough to run
//! inline behind the async trait. Unlike Redis there is no TTL introspection
//! and no server-side configuration step.

use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use bytes::Bytes;
use tracing::{debug, info};

use crate::config::MemcachedConfig;
use crate::error::{CacheError, CacheResult};
use crate::traits::{CacheDriver, DriverStats, OpCounters};

fn unavailable(source: anyhow::Error) -> CacheError {
    CacheError::BackendUnavailable {
        backend: "memcached",
        source,
    }
}

/// Memcached cache backend.
pub struct MemcachedCache {
    client: memcache::Client,
    default_ttl: Option<Duration>,
    counters: OpCounters,
}

impl MemcachedCache {
    /// Connect and probe the server with a `version` command.
    pub fn connect(config: &MemcachedConfig) -> CacheResult<Self> {
        let url = format!("memcache://{}:{}", config.host, config.port);
        info!(url = %url, "connecting memcached cache backend");

        let client = memcache::connect(url.as_str())
            .map_err(|e| unavailable(anyhow!("memcached connect to {url} failed: {e}")))?;

        let versions = client
            .version()
            .map_err(|e| unavailable(anyhow!("memcached version probe failed: {e}")))?;
        info!(url = %url, server_count = versions.len(), "memcached cache backend connected");

        Ok(Self {
            client,
            default_ttl: config.default_ttl(),
            counters: OpCounters::default(),
        })
    }
}

#[async_trait]
impl CacheDriver for MemcachedCache {
    async fn get(&self, key: &str) -> CacheResult<Option<Bytes>> {
        let value: Option<Vec<u8>> = self
            .client
            .get(key)
            .map_err(|e| unavailable(anyhow!("memcached GET failed: {e}")))?;

        match value {
            Some(bytes) => {
                self.counters.hit();
                Ok(Some(Bytes::from(bytes)))
            }
            None => {
                self.counters.miss();
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &str, value: Bytes, ttl: Option<Duration>) -> CacheResult<()> {
        // Memcached expiration 0 means never expire.
        let expiration = ttl
            .or(self.default_ttl)
            .map_or(0, |ttl| u32::try_from(ttl.as_secs()).unwrap_or(u32::MAX));

        self.client
            .set(key, value.as_ref(), expiration)
            .map_err(|e| unavailable(anyhow!("memcached SET failed: {e}")))?;

        self.counters.set();
        debug!(key = %key, expiration, "[memcached] cached key");
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        self.client
            .delete(key)
            .map_err(|e| unavailable(anyhow!("memcached DELETE failed: {e}")))?;
        Ok(())
    }

    fn default_ttl(&self) -> Option<Duration> {
        self.default_ttl
    }

    fn name(&self) -> &'static str {
        "memcached"
    }

    fn stats(&self) -> DriverStats {
        self.counters.snapshot()
    }
}
