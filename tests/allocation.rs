//! End-to-end allocation tests against the in-memory repository.

use std::collections::HashSet;
use std::sync::Arc;

use shortling::prelude::*;
use tracing_subscriber::EnvFilter;

/// Installs a test-writer subscriber so allocation retry events show up
/// in `cargo test -- --nocapture` output. Safe to call from every test;
/// only the first call wins.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("shortling=debug".parse().unwrap()),
        )
        .with_test_writer()
        .try_init()
        .ok();
}

fn test_config() -> Config {
    Config {
        base_url: "https://s.test.com".to_string(),
        enforce_https: false,
        tracking_defaults: TrackingFlags {
            visits: true,
            ..Default::default()
        },
        database_url: None,
        db_max_connections: 10,
        db_connect_timeout: 30,
    }
}

fn new_short_url(key: &str) -> NewShortUrl {
    NewShortUrl {
        key: key.to_string(),
        destination_url: "https://example.com".to_string(),
        public_url: format!("https://s.test.com/{key}"),
        redirect_status: 301,
        single_use: false,
        activate_at: None,
        deactivate_at: None,
        tracking: TrackingFlags::default(),
    }
}

#[tokio::test]
async fn test_create_persists_record_with_generated_key() {
    init_tracing();

    let repository = Arc::new(MemoryShortUrlRepository::new());
    let mut builder =
        ShortUrlBuilder::new(test_config(), repository.clone(), RandomKeyGenerator).unwrap();

    let record = builder
        .destination("https://example.com/docs")
        .unwrap()
        .create()
        .await
        .unwrap();

    assert_eq!(record.key.len(), 12);
    assert_eq!(record.public_url, format!("https://s.test.com/{}", record.key));
    assert_eq!(repository.get(&record.key), Some(record));
}

#[tokio::test]
async fn test_enforced_https_rewrites_destination() {
    init_tracing();

    let mut config = test_config();
    config.enforce_https = true;

    let repository = Arc::new(MemoryShortUrlRepository::new());
    let mut builder = ShortUrlBuilder::new(config, repository, RandomKeyGenerator).unwrap();

    let record = builder
        .destination("http://example.com/a")
        .unwrap()
        .create()
        .await
        .unwrap();

    assert_eq!(record.destination_url, "https://example.com/a");
}

#[tokio::test]
async fn test_taken_explicit_key_is_not_reused() {
    init_tracing();

    let repository = Arc::new(MemoryShortUrlRepository::new());
    repository.insert(new_short_url("abc")).await.unwrap();

    let mut builder =
        ShortUrlBuilder::new(test_config(), repository.clone(), RandomKeyGenerator).unwrap();
    builder.destination("https://example.com/b").unwrap();
    builder.key("abc").unwrap();

    let record = builder.create().await.unwrap();

    assert_ne!(record.key, "abc");
    assert_eq!(repository.len(), 2);
    // The original mapping under "abc" is untouched.
    assert_eq!(
        repository.get("abc").unwrap().destination_url,
        "https://example.com"
    );
}

#[tokio::test]
async fn test_builder_reuse_does_not_leak_options() {
    init_tracing();

    let repository = Arc::new(MemoryShortUrlRepository::new());
    let mut builder =
        ShortUrlBuilder::new(test_config(), repository, RandomKeyGenerator).unwrap();

    let first = builder
        .destination("https://example.com/first")
        .unwrap()
        .redirect_status(307)
        .unwrap()
        .single_use(true)
        .track_os(true)
        .create()
        .await
        .unwrap();

    assert_eq!(first.redirect_status, 307);
    assert!(first.single_use);
    assert!(first.tracking.os);

    let second = builder
        .destination("https://example.com/second")
        .unwrap()
        .create()
        .await
        .unwrap();

    assert_eq!(second.redirect_status, 301);
    assert!(!second.single_use);
    assert!(!second.tracking.os);
    assert_ne!(second.key, first.key);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_creates_allocate_distinct_keys() {
    init_tracing();

    const WRITERS: usize = 64;

    let repository = Arc::new(MemoryShortUrlRepository::new());

    let mut handles = Vec::with_capacity(WRITERS);
    for i in 0..WRITERS {
        let repository = repository.clone();
        handles.push(tokio::spawn(async move {
            let mut builder =
                ShortUrlBuilder::new(test_config(), repository, RandomKeyGenerator).unwrap();
            builder
                .destination(format!("https://example.com/{i}"))
                .unwrap()
                .create()
                .await
                .unwrap()
        }));
    }

    let mut keys = HashSet::new();
    for handle in handles {
        let record = handle.await.unwrap();
        assert!(keys.insert(record.key), "duplicate key allocated");
    }

    assert_eq!(keys.len(), WRITERS);
    assert_eq!(repository.len(), WRITERS);
}
