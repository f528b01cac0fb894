//! Split-endpoint routing: gets to the read endpoint, writes to the write
//! endpoint, both endpoints individually addressable.

mod common;

use cache_forge::Cache;
use common::{init_tracing, memory_cache, test_key};

#[tokio::test]
async fn writes_route_to_the_write_endpoint_only() {
    init_tracing();
    let read = memory_cache();
    let write = memory_cache();
    let cache = Cache::split(read.clone(), write.clone());

    let key = test_key("split_write");
    cache.set(&key, "written", None).await.unwrap();

    assert_eq!(
        write.get(&key).await.unwrap().as_deref(),
        Some(b"written".as_slice())
    );
    assert_eq!(read.get(&key).await.unwrap(), None);

    // Without replication between endpoints, the composite read misses.
    assert_eq!(cache.get(&key).await.unwrap(), None);
}

#[tokio::test]
async fn reads_route_to_the_read_endpoint_only() {
    let read = memory_cache();
    let write = memory_cache();
    let cache = Cache::split(read.clone(), write.clone());

    let key = test_key("split_read");
    read.set(&key, "replicated", None).await.unwrap();

    assert_eq!(
        cache.get(&key).await.unwrap().as_deref(),
        Some(b"replicated".as_slice())
    );
    assert_eq!(write.get(&key).await.unwrap(), None);
}

#[tokio::test]
async fn delete_routes_to_the_write_endpoint() {
    let read = memory_cache();
    let write = memory_cache();
    let cache = Cache::split(read.clone(), write.clone());

    let key = test_key("split_delete");
    read.set(&key, "stale", None).await.unwrap();
    write.set(&key, "stale", None).await.unwrap();

    cache.delete(&key).await.unwrap();

    assert_eq!(write.get(&key).await.unwrap(), None);
    // The read endpoint is untouched; replica cleanup is the deployment's job.
    assert!(read.get(&key).await.unwrap().is_some());
}

#[tokio::test]
async fn endpoints_stay_individually_addressable() {
    let read = memory_cache();
    let write = memory_cache();
    let cache = Cache::split(read, write);

    assert!(cache.is_split());
    assert_eq!(cache.backend_name(), "redis-split");

    let read_endpoint = cache.read_cache().unwrap();
    let write_endpoint = cache.write_cache().unwrap();

    let key = test_key("split_direct");
    write_endpoint.set(&key, "direct", None).await.unwrap();
    assert_eq!(read_endpoint.get(&key).await.unwrap(), None);
    assert_eq!(
        write_endpoint.get(&key).await.unwrap().as_deref(),
        Some(b"direct".as_slice())
    );
}

#[tokio::test]
async fn split_default_ttl_follows_the_write_endpoint() {
    let read = common::memory_cache_with_ttl(30);
    let write = common::memory_cache_with_ttl(600);
    let cache = Cache::split(read, write);

    assert_eq!(cache.default_ttl(), Some(std::time::Duration::from_secs(600)));
}
