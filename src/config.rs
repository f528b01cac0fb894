//! Declarative cache configuration.
//!
//! A [`CacheConfig`] selects one backend out of a closed set and carries that
//! backend's connection and TTL settings. The `multi` variant nests further
//! configurations, so a tier may itself be a split Redis pair or another
//! multi-tier composition.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CacheError;

/// The closed set of backend kinds.
///
/// This doubles as the backend registry: construction selects a driver by
/// exhaustively matching [`CacheConfig`], and [`BackendKind::from_name`] is
/// the name lookup used when a configuration arrives as JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Memory,
    Redis,
    Memcached,
    Multi,
}

impl BackendKind {
    /// Every registered backend kind, in declaration order.
    pub const ALL: [Self; 4] = [Self::Memory, Self::Redis, Self::Memcached, Self::Multi];

    /// Resolve a symbolic store-type name. Returns `None` for unknown names.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "memory" => Some(Self::Memory),
            "redis" => Some(Self::Redis),
            "memcached" => Some(Self::Memcached),
            "multi" => Some(Self::Multi),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Redis => "redis",
            Self::Memcached => "memcached",
            Self::Multi => "multi",
        }
    }
}

/// Backend selection plus backend-specific settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CacheConfig {
    Memory(MemoryConfig),
    Redis(RedisConfig),
    Memcached(MemcachedConfig),
    Multi(MultiConfig),
}

impl Default for CacheConfig {
    /// With no configuration supplied, callers get the in-process memory backend.
    fn default() -> Self {
        Self::Memory(MemoryConfig::default())
    }
}

impl CacheConfig {
    /// Parse a declarative configuration from JSON.
    ///
    /// The `type` field is resolved through [`BackendKind::from_name`] first,
    /// so an unregistered store type fails with
    /// [`CacheError::UnknownBackendType`] naming the offending string rather
    /// than a generic deserialization error.
    pub fn from_value(value: serde_json::Value) -> Result<Self, CacheError> {
        let kind = value
            .get("type")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
            .to_string();
        if BackendKind::from_name(&kind).is_none() {
            return Err(CacheError::UnknownBackendType(kind));
        }
        serde_json::from_value(value).map_err(|e| CacheError::InvalidConfig(e.to_string()))
    }

    /// The backend kind this configuration selects.
    #[must_use]
    pub fn kind(&self) -> BackendKind {
        match self {
            Self::Memory(_) => BackendKind::Memory,
            Self::Redis(_) => BackendKind::Redis,
            Self::Memcached(_) => BackendKind::Memcached,
            Self::Multi(_) => BackendKind::Multi,
        }
    }
}

/// Settings for the in-process memory backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Maximum number of entries before the backend starts evicting.
    pub max_capacity: u64,
    /// TTL applied when a set does not specify one. Absent means no expiry.
    pub default_ttl_secs: Option<u64>,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
            default_ttl_secs: None,
        }
    }
}

impl MemoryConfig {
    #[must_use]
    pub fn default_ttl(&self) -> Option<Duration> {
        self.default_ttl_secs.map(Duration::from_secs)
    }
}

/// Settings for the Redis backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisConfig {
    pub host: String,
    pub port: u16,
    /// Endpoint served reads when splitting. Both `read_host` and
    /// `write_host` set and differing produces a split-endpoint handle.
    pub read_host: Option<String>,
    /// Endpoint served writes when splitting.
    pub write_host: Option<String>,
    /// TTL applied when a set does not specify one. Absent means no expiry.
    pub default_ttl_secs: Option<u64>,
    /// Reconnect attempts for the connection manager. Zero leaves
    /// reconnection policy entirely to the deployment, which is the default.
    pub retries: usize,
    /// `CONFIG SET` pairs applied once, in order, over a short-lived
    /// bootstrap connection when the cache is built.
    pub configure: Vec<(String, String)>,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 6379,
            read_host: None,
            write_host: None,
            default_ttl_secs: None,
            retries: 0,
            configure: Vec::new(),
        }
    }
}

/// How gets and sets are routed across the configured Redis hosts.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum HostRouting<'a> {
    /// Distinct read and write endpoints behind a split adapter.
    Split { read: &'a str, write: &'a str },
    /// One driver serving both directions.
    Single(&'a str),
}

impl RedisConfig {
    #[must_use]
    pub fn default_ttl(&self) -> Option<Duration> {
        self.default_ttl_secs.map(Duration::from_secs)
    }

    /// Connection URL for a specific host, keeping the configured port.
    #[must_use]
    pub fn url_for(&self, host: &str) -> String {
        format!("redis://{host}:{}", self.port)
    }

    /// Split only when both endpoints are present and differ; a single
    /// endpoint, or two equal ones, collapses to one driver on that host.
    pub(crate) fn routing(&self) -> HostRouting<'_> {
        match (self.read_host.as_deref(), self.write_host.as_deref()) {
            (Some(read), Some(write)) if read != write => HostRouting::Split { read, write },
            (Some(host), _) | (None, Some(host)) => HostRouting::Single(host),
            (None, None) => HostRouting::Single(&self.host),
        }
    }
}

/// Settings for the memcached backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemcachedConfig {
    pub host: String,
    pub port: u16,
    /// TTL applied when a set does not specify one. Absent means no expiry.
    pub default_ttl_secs: Option<u64>,
}

impl Default for MemcachedConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 11211,
            default_ttl_secs: None,
        }
    }
}

impl MemcachedConfig {
    #[must_use]
    pub fn default_ttl(&self) -> Option<Duration> {
        self.default_ttl_secs.map(Duration::from_secs)
    }
}

/// Ordered tiers of a multi-tier composition, fastest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultiConfig {
    pub stores: Vec<CacheConfig>,
}
