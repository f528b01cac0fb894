//! Read/write endpoint splitting.
//!
//! Wraps two independent drivers behind the uniform contract: `get` goes to
//! the read endpoint, `set` and `delete` to the write endpoint. Nothing here
//! replicates data between the two; keeping them consistent is the backing
//! deployment's job (e.g. Redis replica wiring).

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::Cache;
use crate::error::CacheResult;
use crate::traits::{CacheDriver, DriverStats};

/// Routes reads and writes to two independent cache handles.
pub struct SplitCache {
    read: Cache,
    write: Cache,
}

impl SplitCache {
    #[must_use]
    pub fn new(read: Cache, write: Cache) -> Self {
        Self { read, write }
    }
}

#[async_trait]
impl CacheDriver for SplitCache {
    async fn get(&self, key: &str) -> CacheResult<Option<Bytes>> {
        self.read.get(key).await
    }

    async fn set(&self, key: &str, value: Bytes, ttl: Option<Duration>) -> CacheResult<()> {
        self.write.set(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        self.write.delete(key).await
    }

    /// Writes land on the write endpoint, so its default governs.
    fn default_ttl(&self) -> Option<Duration> {
        self.write.default_ttl()
    }

    fn name(&self) -> &'static str {
        "redis-split"
    }

    fn stats(&self) -> DriverStats {
        let read = self.read.stats();
        let write = self.write.stats();
        DriverStats {
            hits: read.hits + write.hits,
            misses: read.misses + write.misses,
            sets: read.sets + write.sets,
        }
    }

    async fn health_check(&self) -> bool {
        self.read.health_check().await && self.write.health_check().await
    }
}
