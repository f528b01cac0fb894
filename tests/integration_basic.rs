//! Factory construction and memory backend behavior.

mod common;

use std::time::Duration;

use cache_forge::{CacheConfig, CacheError, make_cache, make_cache_from_value};
use common::{init_tracing, test_key};
use serde_json::json;

#[tokio::test]
async fn default_config_builds_memory_cache() {
    init_tracing();
    let cache = make_cache(CacheConfig::default()).await.unwrap();
    assert_eq!(cache.backend_name(), "memory");
    assert!(!cache.is_split());

    let key = test_key("default");
    cache.set(&key, "hello", None).await.unwrap();
    let cached = cache.get(&key).await.unwrap();
    assert_eq!(cached.as_deref(), Some(b"hello".as_slice()));

    cache.delete(&key).await.unwrap();
    assert_eq!(cache.get(&key).await.unwrap(), None);
}

#[tokio::test]
async fn delete_is_idempotent() {
    let cache = make_cache(CacheConfig::default()).await.unwrap();
    let key = test_key("never_set");

    cache.delete(&key).await.unwrap();
    cache.delete(&key).await.unwrap();
}

#[tokio::test]
async fn unknown_store_type_fails_naming_it() {
    let err = make_cache_from_value(json!({"type": "bogus"}))
        .await
        .unwrap_err();

    match &err {
        CacheError::UnknownBackendType(name) => assert_eq!(name, "bogus"),
        other => panic!("expected UnknownBackendType, got {other:?}"),
    }
    assert!(err.to_string().contains("bogus"));
}

#[tokio::test]
async fn memory_cache_from_json_value() {
    let cache = make_cache_from_value(json!({
        "type": "memory",
        "max_capacity": 64,
    }))
    .await
    .unwrap();

    let key = test_key("json_memory");
    cache.set(&key, vec![1u8, 2, 3], None).await.unwrap();
    assert_eq!(
        cache.get(&key).await.unwrap().as_deref(),
        Some([1u8, 2, 3].as_slice())
    );
}

#[tokio::test]
async fn multi_with_no_stores_is_invalid() {
    let err = make_cache_from_value(json!({"type": "multi", "stores": []}))
        .await
        .unwrap_err();
    assert!(matches!(err, CacheError::InvalidConfig(_)));
}

#[tokio::test]
async fn explicit_ttl_expires_entries() {
    let cache = make_cache(CacheConfig::default()).await.unwrap();
    let key = test_key("ttl");

    cache
        .set(&key, "short-lived", Some(Duration::from_millis(100)))
        .await
        .unwrap();
    assert!(cache.get(&key).await.unwrap().is_some());

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(cache.get(&key).await.unwrap(), None);
}

#[tokio::test]
async fn configured_default_ttl_applies_to_unqualified_sets() {
    let cache = make_cache_from_value(json!({
        "type": "memory",
        "default_ttl_secs": 1,
    }))
    .await
    .unwrap();

    assert_eq!(cache.default_ttl(), Some(Duration::from_secs(1)));

    let key = test_key("default_ttl");
    cache.set(&key, "expiring", None).await.unwrap();
    assert!(cache.get(&key).await.unwrap().is_some());

    tokio::time::sleep(Duration::from_millis(1200)).await;
    assert_eq!(cache.get(&key).await.unwrap(), None);
}

#[tokio::test]
async fn stats_count_hits_misses_and_sets() {
    let cache = make_cache(CacheConfig::default()).await.unwrap();
    let key = test_key("stats");

    let _ = cache.get(&key).await.unwrap();
    cache.set(&key, "v", None).await.unwrap();
    let _ = cache.get(&key).await.unwrap();
    let _ = cache.get(&key).await.unwrap();

    let stats = cache.stats();
    assert_eq!(stats.sets, 1);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 2);
}

#[tokio::test]
async fn memory_health_check_round_trips() {
    let cache = make_cache(CacheConfig::default()).await.unwrap();
    assert!(cache.health_check().await);
}

#[tokio::test]
async fn plain_handles_expose_no_split_endpoints() {
    let cache = make_cache(CacheConfig::default()).await.unwrap();
    assert!(cache.read_cache().is_none());
    assert!(cache.write_cache().is_none());
}
