use dnstoys_domain::{DomainError, ErrorKind};
use dnstoys_infrastructure::cache::UpstreamCache;
use futures::future::join_all;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn cache(max_entries: usize) -> Arc<UpstreamCache<String, String>> {
    Arc::new(UpstreamCache::new(
        "test-source",
        max_entries,
        Duration::from_secs(60),
    ))
}

async fn slow_fetch(calls: Arc<AtomicUsize>, value: &str) -> Result<String, DomainError> {
    calls.fetch_add(1, Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(50)).await;
    Ok(value.to_string())
}

#[tokio::test]
async fn test_concurrent_misses_fetch_once() {
    let cache = cache(10);
    let calls = Arc::new(AtomicUsize::new(0));

    let tasks: Vec<_> = (0..50)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let calls = Arc::clone(&calls);
            tokio::spawn(async move {
                cache
                    .get("berlin/de".to_string(), Duration::from_secs(1), || {
                        slow_fetch(calls, "sunny")
                    })
                    .await
            })
        })
        .collect();

    let results = join_all(tasks).await;

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    for result in results {
        assert_eq!(*result.unwrap().unwrap().value, "sunny");
    }
    assert_eq!(cache.inflight_count(), 0);
    assert_eq!(cache.len(), 1);
}

#[tokio::test]
async fn test_failure_is_shared_and_not_cached() {
    let cache = cache(10);
    let calls = Arc::new(AtomicUsize::new(0));

    let tasks: Vec<_> = (0..10)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let calls = Arc::clone(&calls);
            tokio::spawn(async move {
                cache
                    .get("oslo/no".to_string(), Duration::from_secs(1), || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(30)).await;
                        Err::<String, _>(DomainError::upstream("test-source", "HTTP 500"))
                    })
                    .await
            })
        })
        .collect();

    for result in join_all(tasks).await {
        let err = result.unwrap().unwrap_err();
        assert_eq!(err, DomainError::upstream("test-source", "HTTP 500"));
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(cache.is_empty());

    let calls_after = Arc::new(AtomicUsize::new(0));
    let retry = cache
        .get("oslo/no".to_string(), Duration::from_secs(1), || {
            slow_fetch(Arc::clone(&calls_after), "snow")
        })
        .await
        .unwrap();
    assert_eq!(*retry.value, "snow");
    assert_eq!(calls_after.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_timeout_is_upstream_failure_and_releases_slot() {
    let cache = cache(10);

    let err = cache
        .get("lima/pe".to_string(), Duration::from_millis(30), || async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("late".to_string())
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        DomainError::UpstreamTimeout { timeout_ms: 30, .. }
    ));
    assert_eq!(err.kind(), ErrorKind::Upstream);
    assert_eq!(cache.inflight_count(), 0);
    assert!(cache.is_empty());

    let ok = cache
        .get("lima/pe".to_string(), Duration::from_millis(500), || async {
            Ok("cloudy".to_string())
        })
        .await
        .unwrap();
    assert_eq!(*ok.value, "cloudy");
}

#[tokio::test]
async fn test_cancelled_leader_lets_waiter_retry() {
    let cache = cache(10);

    let leader = {
        let cache = Arc::clone(&cache);
        tokio::spawn(async move {
            cache
                .get("rome/it".to_string(), Duration::from_secs(10), || async {
                    tokio::time::sleep(Duration::from_secs(10)).await;
                    Ok("never".to_string())
                })
                .await
        })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;

    let follower = {
        let cache = Arc::clone(&cache);
        tokio::spawn(async move {
            cache
                .get("rome/it".to_string(), Duration::from_secs(1), || async {
                    Ok("sunny".to_string())
                })
                .await
        })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;

    leader.abort();
    let result = tokio::time::timeout(Duration::from_secs(1), follower)
        .await
        .expect("follower must not hang")
        .unwrap()
        .unwrap();

    assert_eq!(*result.value, "sunny");
    assert_eq!(cache.inflight_count(), 0);
}

#[tokio::test]
async fn test_lru_entry_is_evicted_at_capacity() {
    let cache = cache(2);
    let calls = Arc::new(AtomicUsize::new(0));
    let fetch = |value: &'static str| {
        let calls = Arc::clone(&calls);
        move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, DomainError>(value.to_string())
        }
    };
    let timeout = Duration::from_secs(1);

    cache.get("a".into(), timeout, fetch("a")).await.unwrap();
    cache.get("b".into(), timeout, fetch("b")).await.unwrap();
    // touch "a" so "b" becomes least recently used
    cache.get("a".into(), timeout, fetch("a")).await.unwrap();
    cache.get("c".into(), timeout, fetch("c")).await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(cache.len(), 2);
    assert!(cache.contains(&"a".to_string()));
    assert!(!cache.contains(&"b".to_string()));
    assert!(cache.contains(&"c".to_string()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_repeated_failures_keep_one_fetch_in_flight() {
    let cache = cache(10);
    let active = Arc::new(AtomicUsize::new(0));
    let max_active = Arc::new(AtomicUsize::new(0));
    let calls = Arc::new(AtomicUsize::new(0));
    let deadline = tokio::time::Instant::now() + Duration::from_millis(500);

    let tasks: Vec<_> = (0..16)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let active = Arc::clone(&active);
            let max_active = Arc::clone(&max_active);
            let calls = Arc::clone(&calls);
            tokio::spawn(async move {
                while tokio::time::Instant::now() < deadline {
                    let active = Arc::clone(&active);
                    let max_active = Arc::clone(&max_active);
                    let calls = Arc::clone(&calls);
                    let result = cache
                        .get("berlin/de".to_string(), Duration::from_secs(1), || async move {
                            calls.fetch_add(1, Ordering::SeqCst);
                            let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                            max_active.fetch_max(now, Ordering::SeqCst);
                            tokio::time::sleep(Duration::from_micros(200)).await;
                            active.fetch_sub(1, Ordering::SeqCst);
                            Err::<String, _>(DomainError::upstream("test-source", "down"))
                        })
                        .await;
                    assert!(result.is_err());
                }
            })
        })
        .collect();

    for result in join_all(tasks).await {
        result.unwrap();
    }

    assert!(calls.load(Ordering::SeqCst) > 0);
    assert_eq!(max_active.load(Ordering::SeqCst), 1);
    assert_eq!(cache.inflight_count(), 0);
    assert!(cache.is_empty());
}
