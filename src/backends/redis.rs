//! Redis backend over a shared connection manager.
//!
//! One driver owns one `ConnectionManager`; read/write splitting builds two
//! independent drivers pointed at different hosts. Reconnection policy stays
//! with the client and defaults to none (`retries: 0`).

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::{AsyncCommands, Client};
use tracing::{debug, info};

use crate::config::RedisConfig;
use crate::error::{CacheError, CacheResult};
use crate::traits::{CacheDriver, DriverStats, OpCounters};

fn unavailable(source: anyhow::Error) -> CacheError {
    CacheError::BackendUnavailable {
        backend: "redis",
        source,
    }
}

/// Redis cache backend.
pub struct RedisCache {
    conn: ConnectionManager,
    default_ttl: Option<Duration>,
    counters: OpCounters,
}

impl RedisCache {
    /// Connect to the configured server. `host` overrides the configured
    /// primary host; endpoint splitting uses this to point the read and
    /// write drivers at different servers while sharing the rest of the
    /// configuration.
    pub async fn connect(config: &RedisConfig, host: Option<&str>) -> CacheResult<Self> {
        let url = config.url_for(host.unwrap_or(&config.host));
        info!(url = %url, retries = config.retries, "connecting redis cache backend");

        let client = Client::open(url.as_str())
            .with_context(|| format!("invalid redis url {url}"))
            .map_err(unavailable)?;

        let manager_config = ConnectionManagerConfig::new().set_number_of_retries(config.retries);
        let mut conn = ConnectionManager::new_with_config(client, manager_config)
            .await
            .with_context(|| format!("failed to establish redis connection to {url}"))
            .map_err(unavailable)?;

        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .context("redis PING failed")
            .map_err(unavailable)?;

        Ok(Self {
            conn,
            default_ttl: config.default_ttl(),
            counters: OpCounters::default(),
        })
    }
}

/// Apply the configured `CONFIG SET` directives, in order, over a dedicated
/// bootstrap connection that is dropped as soon as the last directive lands.
///
/// This is NOT the long-lived driver connection. The factory runs this
/// detached from handle construction; a rejected directive fails the whole
/// step and is surfaced only through logging.
pub async fn apply_config_directives(config: &RedisConfig) -> CacheResult<()> {
    let url = config.url_for(&config.host);
    let client = Client::open(url.as_str())
        .with_context(|| format!("invalid redis url {url}"))
        .map_err(unavailable)?;
    let mut conn = client
        .get_multiplexed_async_connection()
        .await
        .with_context(|| format!("redis bootstrap connection to {url} failed"))
        .map_err(unavailable)?;

    for (setting, value) in &config.configure {
        let reply: String = redis::cmd("CONFIG")
            .arg("SET")
            .arg(setting)
            .arg(value)
            .query_async(&mut conn)
            .await
            .map_err(|e| CacheError::ConfigurationRejected {
                directive: setting.clone(),
                reason: e.to_string(),
            })?;

        if reply != "OK" {
            return Err(CacheError::ConfigurationRejected {
                directive: setting.clone(),
                reason: format!("server replied '{reply}'"),
            });
        }

        debug!(setting = %setting, "[redis] applied configuration directive");
    }

    Ok(())
}

#[async_trait]
impl CacheDriver for RedisCache {
    async fn get(&self, key: &str) -> CacheResult<Option<Bytes>> {
        let mut conn = self.conn.clone();

        let value: Option<Vec<u8>> = conn
            .get(key)
            .await
            .context("redis GET failed")
            .map_err(unavailable)?;

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
        let mut conn = self.conn.clone();
        let ttl = ttl.or(self.default_ttl).filter(|ttl| !ttl.is_zero());

        match ttl {
            Some(ttl) => {
                let _: () = conn
                    .set_ex(key, value.as_ref(), ttl.as_secs())
                    .await
                    .context("redis SETEX failed")
                    .map_err(unavailable)?;
            }
            None => {
                let _: () = conn
                    .set(key, value.as_ref())
                    .await
                    .context("redis SET failed")
                    .map_err(unavailable)?;
            }
        }

        self.counters.set();
        debug!(key = %key, ttl_secs = ttl.map(|t| t.as_secs()), "[redis] cached key");
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        let mut conn = self.conn.clone();
        let _: () = conn
            .del(key)
            .await
            .context("redis DEL failed")
            .map_err(unavailable)?;
        Ok(())
    }

    fn default_ttl(&self) -> Option<Duration> {
        self.default_ttl
    }

    fn name(&self) -> &'static str {
        "redis"
    }

    fn stats(&self) -> DriverStats {
        self.counters.snapshot()
    }
}
