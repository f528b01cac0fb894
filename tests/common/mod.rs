//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use cache_forge::error::{CacheError, CacheResult};
use cache_forge::traits::{CacheDriver, DriverStats};
use cache_forge::{Cache, MemoryCache, MemoryConfig};

/// Install a subscriber once so test logs respect `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Unique key per test run to avoid collisions between tests.
pub fn test_key(name: &str) -> String {
    format!("test_{}_{}", name, rand::random::<u32>())
}

/// Memory-backed handle for composing tiers and split pairs in tests.
pub fn memory_cache() -> Cache {
    Cache::from_driver(Arc::new(MemoryCache::new(&MemoryConfig::default())))
}

pub fn memory_cache_with_ttl(default_ttl_secs: u64) -> Cache {
    let config = MemoryConfig {
        default_ttl_secs: Some(default_ttl_secs),
        ..MemoryConfig::default()
    };
    Cache::from_driver(Arc::new(MemoryCache::new(&config)))
}

/// Poll a cache until the key shows up or the timeout elapses.
pub async fn wait_for_key(cache: &Cache, key: &str, timeout: Duration) -> bool {
    let deadline = std::time::Instant::now() + timeout;
    while std::time::Instant::now() < deadline {
        if let Ok(Some(_)) = cache.get(key).await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

/// Driver whose writes can be switched to fail, backed by a real memory
/// store so reads still behave normally. Used for partial-failure tests.
pub struct FlakyDriver {
    inner: MemoryCache,
    fail_writes: Arc<AtomicBool>,
}

impl FlakyDriver {
    pub fn new() -> (Self, Arc<AtomicBool>) {
        let fail_writes = Arc::new(AtomicBool::new(false));
        let driver = Self {
            inner: MemoryCache::new(&MemoryConfig::default()),
            fail_writes: Arc::clone(&fail_writes),
        };
        (driver, fail_writes)
    }

    fn check_writable(&self) -> CacheResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(CacheError::BackendUnavailable {
                backend: "flaky",
                source: anyhow::anyhow!("induced write failure"),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CacheDriver for FlakyDriver {
    async fn get(&self, key: &str) -> CacheResult<Option<Bytes>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: Bytes, ttl: Option<Duration>) -> CacheResult<()> {
        self.check_writable()?;
        self.inner.set(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        self.check_writable()?;
        self.inner.delete(key).await
    }

    fn default_ttl(&self) -> Option<Duration> {
        self.inner.default_ttl()
    }

    fn name(&self) -> &'static str {
        "flaky"
    }

    fn stats(&self) -> DriverStats {
        self.inner.stats()
    }
}

/// A flaky handle plus the switch that makes its writes fail.
pub fn flaky_cache() -> (Cache, Arc<AtomicBool>) {
    let (driver, fail_writes) = FlakyDriver::new();
    (Cache::from_driver(Arc::new(driver)), fail_writes)
}
