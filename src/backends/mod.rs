//! Concrete cache backend drivers.
//!
//! Each driver is a thin adapter that puts one client library behind
//! [`CacheDriver`](crate::CacheDriver):
//!
//! - **memory**: in-process store over moka (capacity-bounded, per-entry TTL)
//! - **redis**: distributed store over a redis `ConnectionManager`, with the
//!   bootstrap `CONFIG SET` step and read/write endpoint splitting
//! - **memcached**: distributed store over the synchronous memcache client
//!
//! The composing drivers live next door: [`crate::split`] routes reads and
//! writes to two drivers, [`crate::multi_tier`] layers an ordered list of
//! handles.

pub mod memcached;
pub mod memory;
pub mod redis;

pub use self::memcached::MemcachedCache;
pub use self::memory::MemoryCache;
pub use self::redis::RedisCache;
