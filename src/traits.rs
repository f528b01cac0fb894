//! Backend driver contract.
//!
//! Every concrete store (in-process memory, Redis, memcached, the split
//! adapter, the multi-tier composer) sits behind [`CacheDriver`], so the
//! factory can hand out one uniform handle regardless of what it built.
//!
//! # Example: custom driver
//!
//! ```rust,ignore
//! use cache_forge::{CacheDriver, async_trait, Bytes};
//! use cache_forge::error::CacheResult;
//! use std::time::Duration;
//!
//! struct NullCache;
//!
//! #[async_trait]
//! impl CacheDriver for NullCache {
//!     async fn get(&self, _key: &str) -> CacheResult<Option<Bytes>> {
//!         Ok(None)
//!     }
//!
//!     async fn set(&self, _key: &str, _value: Bytes, _ttl: Option<Duration>) -> CacheResult<()> {
//!         Ok(())
//!     }
//!
//!     async fn delete(&self, _key: &str) -> CacheResult<()> {
//!         Ok(())
//!     }
//!
//!     fn default_ttl(&self) -> Option<Duration> {
//!         None
//!     }
//!
//!     fn name(&self) -> &'static str {
//!         "null"
//!     }
//!
//!     fn stats(&self) -> cache_forge::DriverStats {
//!         cache_forge::DriverStats::default()
//!     }
//! }
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::CacheResult;
use crate::multi_tier::TierStats;

/// Uniform asynchronous contract every cache backend satisfies.
///
/// Implementations must be `Send + Sync`; a handle may be cloned across tasks
/// and operations may overlap freely. Values are opaque byte payloads.
#[async_trait]
pub trait CacheDriver: Send + Sync {
    /// Look up a key.
    ///
    /// An absent key is `Ok(None)`, never an error. Fails with
    /// [`CacheError::BackendUnavailable`](crate::CacheError::BackendUnavailable)
    /// when the underlying connection cannot service the request.
    async fn get(&self, key: &str) -> CacheResult<Option<Bytes>>;

    /// Store a value.
    ///
    /// `ttl = None` falls back to the driver's configured default TTL; with
    /// no default either, the entry does not expire (backend semantics).
    async fn set(&self, key: &str, value: Bytes, ttl: Option<Duration>) -> CacheResult<()>;

    /// Remove a key. Idempotent: succeeds when the key is already absent.
    async fn delete(&self, key: &str) -> CacheResult<()>;

    /// TTL applied to sets that do not carry one.
    fn default_ttl(&self) -> Option<Duration>;

    /// Backend name, for logging and failure reports.
    fn name(&self) -> &'static str;

    /// Operation counters accumulated since construction.
    fn stats(&self) -> DriverStats;

    /// Per-tier hit counters; only the multi-tier composer reports these.
    fn tier_stats(&self) -> Option<Vec<TierStats>> {
        None
    }

    /// Round-trip probe: set, read back, delete.
    async fn health_check(&self) -> bool {
        let key = "__cache_forge_health";
        let value = Bytes::from_static(&[1, 2, 3, 4]);

        match self.set(key, value.clone(), Some(Duration::from_secs(10))).await {
            Ok(()) => match self.get(key).await {
                Ok(Some(read)) => {
                    let _ = self.delete(key).await;
                    read == value
                }
                _ => false,
            },
            Err(_) => false,
        }
    }
}

/// Snapshot of a driver's operation counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriverStats {
    pub hits: u64,
    pub misses: u64,
    pub sets: u64,
}

/// Shared counter block used by the concrete backends.
#[derive(Debug, Default)]
pub(crate) struct OpCounters {
    hits: AtomicU64,
    misses: AtomicU64,
    sets: AtomicU64,
}

impl OpCounters {
    pub(crate) fn hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn set(&self) {
        self.sets.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> DriverStats {
        DriverStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            sets: self.sets.load(Ordering::Relaxed),
        }
    }
}
