//! Multi-tier composition.
//!
//! Owns an ordered list of cache handles (tier 0 = fastest) and exposes them
//! as one driver: gets probe downward and repopulate the faster tiers on a
//! hit, writes fan out to every tier at once.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use futures_util::future::join_all;
use tracing::{debug, info, warn};

use crate::Cache;
use crate::error::{CacheError, CacheResult, TierFailure};
use crate::traits::{CacheDriver, DriverStats, OpCounters};

/// Hit count for one tier, reported through [`CacheDriver::tier_stats`].
#[derive(Debug, Clone)]
pub struct TierStats {
    /// Tier index in configuration order (0 = fastest).
    pub tier: usize,
    pub backend: &'static str,
    pub hits: u64,
}

/// Ordered tiers behind one driver.
pub struct MultiTierCache {
    tiers: Vec<Cache>,
    tier_hits: Vec<AtomicU64>,
    /// Keys currently being written back into faster tiers; concurrent hits
    /// on the same key coalesce into one write-back task.
    backfills: Arc<DashMap<String, ()>>,
    counters: OpCounters,
}

impl MultiTierCache {
    #[must_use]
    pub fn new(tiers: Vec<Cache>) -> Self {
        info!(tiers = tiers.len(), "composing multi-tier cache");

        let tier_hits = tiers.iter().map(|_| AtomicU64::new(0)).collect();
        Self {
            tiers,
            tier_hits,
            backfills: Arc::new(DashMap::new()),
            counters: OpCounters::default(),
        }
    }

    /// Detached write-back of a slower-tier hit into every faster tier,
    /// each with its own default TTL. Never blocks the caller's get.
    fn backfill(&self, hit_tier: usize, key: &str, value: &Bytes) {
        if self.backfills.insert(key.to_string(), ()).is_some() {
            return;
        }

        let faster: Vec<Cache> = self.tiers.iter().take(hit_tier).cloned().collect();
        let backfills = Arc::clone(&self.backfills);
        let key = key.to_string();
        let value = value.clone();

        tokio::spawn(async move {
            for (tier, cache) in faster.iter().enumerate() {
                let ttl = cache.default_ttl();
                match cache.set(&key, value.clone(), ttl).await {
                    Ok(()) => {
                        debug!(key = %key, tier, backend = cache.backend_name(), "tier write-back populated");
                    }
                    Err(error) => {
                        warn!(key = %key, tier, backend = cache.backend_name(), %error, "tier write-back failed");
                    }
                }
            }
            backfills.remove(&key);
        });
    }

    fn collect_failures(
        &self,
        operation: &'static str,
        results: Vec<CacheResult<()>>,
    ) -> CacheResult<()> {
        let failures: Vec<TierFailure> = results
            .into_iter()
            .enumerate()
            .filter_map(|(tier, result)| {
                result.err().map(|error| TierFailure {
                    tier,
                    backend: self.tiers.get(tier).map_or("unknown", |c| c.backend_name()),
                    error: error.to_string(),
                })
            })
            .collect();

        if failures.is_empty() {
            Ok(())
        } else {
            Err(CacheError::PartialWriteFailure {
                operation,
                total: self.tiers.len(),
                failures,
            })
        }
    }
}

#[async_trait]
impl CacheDriver for MultiTierCache {
    /// Probe tiers in order; first hit wins and repopulates the faster
    /// tiers asynchronously. A tier that errors is skipped; only when
    /// every tier fails does the error surface.
    async fn get(&self, key: &str) -> CacheResult<Option<Bytes>> {
        let mut first_error = None;
        let mut errored = 0;

        for (tier, cache) in self.tiers.iter().enumerate() {
            match cache.get(key).await {
                Ok(Some(value)) => {
                    self.counters.hit();
                    if let Some(hits) = self.tier_hits.get(tier) {
                        hits.fetch_add(1, Ordering::Relaxed);
                    }
                    debug!(key = %key, tier, backend = cache.backend_name(), "tier hit");
                    if tier > 0 {
                        self.backfill(tier, key, &value);
                    }
                    return Ok(Some(value));
                }
                Ok(None) => {}
                Err(error) => {
                    warn!(key = %key, tier, backend = cache.backend_name(), %error, "tier probe failed");
                    errored += 1;
                    if first_error.is_none() {
                        first_error = Some(error);
                    }
                }
            }
        }

        if errored == self.tiers.len()
            && let Some(error) = first_error
        {
            return Err(error);
        }

        self.counters.miss();
        Ok(None)
    }

    /// Write to all tiers in parallel; wait for every tier and report the
    /// ones that failed. Successful tiers are not rolled back.
    async fn set(&self, key: &str, value: Bytes, ttl: Option<Duration>) -> CacheResult<()> {
        let writes = self.tiers.iter().map(|cache| {
            let value = value.clone();
            async move { cache.set(key, value, ttl).await }
        });

        let results = join_all(writes).await;
        self.counters.set();
        self.collect_failures("set", results)
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        let deletes = self.tiers.iter().map(|cache| cache.delete(key));
        let results = join_all(deletes).await;
        self.collect_failures("delete", results)
    }

    /// Writes without an explicit TTL inherit the fastest tier's default.
    fn default_ttl(&self) -> Option<Duration> {
        self.tiers.first().and_then(Cache::default_ttl)
    }

    fn name(&self) -> &'static str {
        "multi-tier"
    }

    fn stats(&self) -> DriverStats {
        self.counters.snapshot()
    }

    fn tier_stats(&self) -> Option<Vec<TierStats>> {
        Some(
            self.tiers
                .iter()
                .zip(&self.tier_hits)
                .enumerate()
                .map(|(tier, (cache, hits))| TierStats {
                    tier,
                    backend: cache.backend_name(),
                    hits: hits.load(Ordering::Relaxed),
                })
                .collect(),
        )
    }
}
