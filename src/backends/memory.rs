//! In-process memory backend over moka.
//!
//! Eviction is delegated to moka's capacity bound; per-entry expiry is
//! tracked on the entry itself so each set can carry its own TTL.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use bytes::Bytes;
use moka::future::Cache as MokaCache;
use tracing::{debug, info};

use crate::config::MemoryConfig;
use crate::error::CacheResult;
use crate::traits::{CacheDriver, DriverStats, OpCounters};

#[derive(Debug, Clone)]
struct Entry {
    value: Bytes,
    expires_at: Option<Instant>,
}

impl Entry {
    fn new(value: Bytes, ttl: Option<Duration>) -> Self {
        Self {
            value,
            expires_at: ttl.map(|ttl| Instant::now() + ttl),
        }
    }

    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Instant::now() > at)
    }
}

/// In-process cache backend.
pub struct MemoryCache {
    entries: MokaCache<String, Entry>,
    default_ttl: Option<Duration>,
    counters: OpCounters,
}

impl MemoryCache {
    #[must_use]
    pub fn new(config: &MemoryConfig) -> Self {
        info!(capacity = config.max_capacity, "initializing memory cache backend");

        let entries = MokaCache::builder()
            .max_capacity(config.max_capacity)
            .build();

        Self {
            entries,
            default_ttl: config.default_ttl(),
            counters: OpCounters::default(),
        }
    }
}

#[async_trait]
impl CacheDriver for MemoryCache {
    async fn get(&self, key: &str) -> CacheResult<Option<Bytes>> {
        match self.entries.get(key).await {
            Some(entry) if entry.is_expired() => {
                self.entries.invalidate(key).await;
                self.counters.miss();
                Ok(None)
            }
            Some(entry) => {
                self.counters.hit();
                Ok(Some(entry.value))
            }
            None => {
                self.counters.miss();
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &str, value: Bytes, ttl: Option<Duration>) -> CacheResult<()> {
        let ttl = ttl.or(self.default_ttl);
        self.entries.insert(key.to_string(), Entry::new(value, ttl)).await;
        self.counters.set();
        debug!(key = %key, ttl_secs = ttl.map(|t| t.as_secs()), "[memory] cached key");
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        self.entries.invalidate(key).await;
        Ok(())
    }

    fn default_ttl(&self) -> Option<Duration> {
        self.default_ttl
    }

    fn name(&self) -> &'static str {
        "memory"
    }

    fn stats(&self) -> DriverStats {
        self.counters.snapshot()
    }
}
