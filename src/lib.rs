//! cache-forge
//!
//! Build a uniform asynchronous cache handle from declarative configuration:
//! - **memory**: in-process store over moka
//! - **redis**: distributed store, optionally split into distinct read and
//!   write endpoints
//! - **memcached**: distributed store over the memcache client
//! - **multi**: ordered tiers of any of the above, with write-back
//!   population of faster tiers and fan-out writes
//!
//! The crate is a factory over backend clients, not a cache engine: eviction,
//! persistence, and replication stay inside the wrapped stores.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use cache_forge::{CacheConfig, make_cache};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Default configuration is the in-process memory backend.
//!     let cache = make_cache(CacheConfig::default()).await?;
//!
//!     cache.set("user:1", "alice", None).await?;
//!     if let Some(value) = cache.get("user:1").await? {
//!         tracing::info!("cached: {:?}", value);
//!     }
//!     cache.delete("user:1").await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Declarative configuration
//!
//! ```rust,no_run
//! use cache_forge::make_cache_from_value;
//! use serde_json::json;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let cache = make_cache_from_value(json!({
//!     "type": "multi",
//!     "stores": [
//!         {"type": "memory", "default_ttl_secs": 60},
//!         {"type": "redis", "host": "cache.internal", "default_ttl_secs": 600},
//!     ],
//! }))
//! .await?;
//!
//! cache.set("hot", "payload", None).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Split endpoints
//!
//! A Redis configuration with differing `read_host` and `write_host` yields a
//! handle that routes gets to one server and sets/deletes to the other, with
//! both endpoints still individually addressable:
//!
//! ```rust,no_run
//! # async fn example() -> anyhow::Result<()> {
//! use cache_forge::make_cache_from_value;
//! use serde_json::json;
//!
//! let cache = make_cache_from_value(json!({
//!     "type": "redis",
//!     "read_host": "replica.internal",
//!     "write_host": "primary.internal",
//! }))
//! .await?;
//!
//! let replica = cache.read_cache().ok_or_else(|| anyhow::anyhow!("not split"))?;
//! let value = replica.get("user:1").await?;
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

pub mod backends;
pub mod config;
pub mod error;
pub mod factory;
pub mod multi_tier;
pub mod split;
pub mod traits;

pub use backends::{MemcachedCache, MemoryCache, RedisCache};
pub use config::{
    BackendKind, CacheConfig, MemcachedConfig, MemoryConfig, MultiConfig, RedisConfig,
};
pub use error::{CacheError, CacheResult, TierFailure};
pub use factory::{make_cache, make_cache_from_value};
pub use multi_tier::{MultiTierCache, TierStats};
pub use split::SplitCache;
pub use traits::{CacheDriver, DriverStats};

// Re-exported for custom driver implementations.
pub use async_trait::async_trait;
pub use bytes::Bytes;

/// Uniform cache handle returned by the factory.
///
/// Cheap to clone; all clones share the same driver. For split
/// configurations the two endpoints stay individually addressable through
/// [`Cache::read_cache`] and [`Cache::write_cache`].
#[derive(Clone)]
pub struct Cache {
    driver: Arc<dyn CacheDriver>,
    endpoints: Option<Arc<SplitEndpoints>>,
}

struct SplitEndpoints {
    read: Cache,
    write: Cache,
}

impl Cache {
    /// Wrap a driver in a handle.
    #[must_use]
    pub fn from_driver(driver: Arc<dyn CacheDriver>) -> Self {
        Self {
            driver,
            endpoints: None,
        }
    }

    /// Compose a read handle and a write handle into a split-endpoint handle.
    #[must_use]
    pub fn split(read: Cache, write: Cache) -> Self {
        let driver = Arc::new(split::SplitCache::new(read.clone(), write.clone()));
        Self {
            driver,
            endpoints: Some(Arc::new(SplitEndpoints { read, write })),
        }
    }

    /// Look up a key. Absent keys are `Ok(None)`.
    pub async fn get(&self, key: &str) -> CacheResult<Option<Bytes>> {
        self.driver.get(key).await
    }

    /// Store a value; `ttl = None` uses the backend's configured default.
    pub async fn set(
        &self,
        key: &str,
        value: impl Into<Bytes> + Send,
        ttl: Option<Duration>,
    ) -> CacheResult<()> {
        self.driver.set(key, value.into(), ttl).await
    }

    /// Remove a key; succeeds even when the key is absent.
    pub async fn delete(&self, key: &str) -> CacheResult<()> {
        self.driver.delete(key).await
    }

    /// Round-trip probe of every backing driver.
    pub async fn health_check(&self) -> bool {
        self.driver.health_check().await
    }

    #[must_use]
    pub fn default_ttl(&self) -> Option<Duration> {
        self.driver.default_ttl()
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.driver.name()
    }

    /// Operation counters for the backing driver.
    #[must_use]
    pub fn stats(&self) -> DriverStats {
        self.driver.stats()
    }

    /// Per-tier hit counters; `None` unless this is a multi-tier handle.
    #[must_use]
    pub fn tier_stats(&self) -> Option<Vec<TierStats>> {
        self.driver.tier_stats()
    }

    /// The read endpoint of a split handle.
    #[must_use]
    pub fn read_cache(&self) -> Option<&Cache> {
        self.endpoints.as_deref().map(|e| &e.read)
    }

    /// The write endpoint of a split handle.
    #[must_use]
    pub fn write_cache(&self) -> Option<&Cache> {
        self.endpoints.as_deref().map(|e| &e.write)
    }

    #[must_use]
    pub fn is_split(&self) -> bool {
        self.endpoints.is_some()
    }
}

impl fmt::Debug for Cache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("backend", &self.driver.name())
            .field("split", &self.endpoints.is_some())
            .finish()
    }
}
