use std::time::{Duration, Instant};

use kc_core::settings::{CacheSettings, Settings};

use super::{Harness, StaticFetcher};
use crate::cache::{MappingCache, MappingState};

fn cache_with(retry_failed: bool) -> (MappingCache, std::sync::Arc<StaticFetcher>) {
    let fetcher = std::sync::Arc::new(StaticFetcher::new());
    let cache = MappingCache::new(fetcher.clone(), &CacheSettings { retry_failed }).unwrap();
    (cache, fetcher)
}

#[test]
fn test_unknown_code_is_unloaded() {
    let (cache, _) = cache_with(true);
    assert!(matches!(cache.get("ru"), MappingState::Unloaded));
    assert_eq!(cache.in_flight(), 0);
}

#[test]
fn test_at_most_one_fetch_per_code() {
    let (mut cache, fetcher) = cache_with(true);
    assert!(cache.load("ru"));
    assert!(!cache.load("ru"));
    assert!(matches!(cache.get("ru"), MappingState::Loading));
    cache.settle();
    assert!(!cache.load("ru"));
    assert_eq!(fetcher.fetch_count("ru"), 1);

    let MappingState::Ready(table) = cache.get("ru") else {
        panic!("ru should be ready");
    };
    assert_eq!(table.get("сh"), Some("ш"));
}

#[test]
fn test_poll_applies_finished_loads() {
    let (mut cache, _) = cache_with(true);
    cache.load("ru");
    cache.load("ya");

    let deadline = Instant::now() + Duration::from_secs(5);
    let mut applied = 0;
    while applied < 2 && Instant::now() < deadline {
        applied += cache.poll();
        std::thread::sleep(Duration::from_millis(1));
    }
    assert_eq!(applied, 2);
    assert_eq!(cache.in_flight(), 0);
    assert!(matches!(cache.get("ya"), MappingState::Ready(_)));
}

#[test]
fn test_missing_resource_fails() {
    let (mut cache, _) = cache_with(true);
    cache.load("xx");
    cache.settle();
    assert!(matches!(cache.get("xx"), MappingState::Failed));
}

#[test]
fn test_invalid_mapping_fails() {
    let (mut cache, _) = cache_with(true);
    cache.load("bad");
    cache.settle();
    assert!(matches!(cache.get("bad"), MappingState::Failed));
}

#[test]
fn test_failed_load_retried() {
    let (mut cache, fetcher) = cache_with(true);
    cache.load("xx");
    cache.settle();
    assert!(cache.load("xx"));
    cache.settle();
    assert_eq!(fetcher.fetch_count("xx"), 2);
}

#[test]
fn test_failed_load_sticky_without_retry() {
    let (mut cache, fetcher) = cache_with(false);
    cache.load("xx");
    cache.settle();
    assert!(!cache.load("xx"));
    assert_eq!(fetcher.fetch_count("xx"), 1);
    assert!(matches!(cache.get("xx"), MappingState::Failed));
}

#[test]
fn test_shared_by_fields_of_same_language() {
    let mut h = Harness::with_settings(Settings::default());
    h.textarea(Some("ru"));
    h.textarea(Some("ru"));
    h.textarea(Some("ya"));
    assert_eq!(h.scan_and_settle(), 3);
    assert_eq!(h.fetcher.fetch_count("ru"), 1);
    assert_eq!(h.fetcher.fetch_count("ya"), 1);
}
