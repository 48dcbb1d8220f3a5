use dnstoys_domain::{DomainError, ErrorKind};
use lru::LruCache;
use rustc_hash::FxHashMap;
use std::future::Future;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::debug;

/// A cached value together with how long it stays valid.
#[derive(Debug)]
pub struct CacheHit<V> {
    pub value: Arc<V>,
    pub remaining_ttl: Duration,
}

impl<V> Clone for CacheHit<V> {
    fn clone(&self) -> Self {
        Self {
            value: Arc::clone(&self.value),
            remaining_ttl: self.remaining_ttl,
        }
    }
}

type Outcome<V> = Result<CacheHit<V>, DomainError>;
type InflightSender<V> = Arc<watch::Sender<Option<Outcome<V>>>>;
type InflightReceiver<V> = watch::Receiver<Option<Outcome<V>>>;

struct Entry<V> {
    value: Arc<V>,
    expires_at: Instant,
}

struct Directory<K: Hash + Eq, V> {
    entries: LruCache<K, Entry<V>>,
    inflight: FxHashMap<K, InflightSender<V>>,
}

enum Lookup<V> {
    Hit(CacheHit<V>),
    Leader(InflightSender<V>),
    Follower(InflightReceiver<V>),
}

fn lock<K: Hash + Eq, V>(directory: &Mutex<Directory<K, V>>) -> MutexGuard<'_, Directory<K, V>> {
    directory.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Removes `key`'s in-flight slot only if it still belongs to `tx`; a later
/// leader may have registered under the same key.
fn release_own_slot<K: Hash + Eq, V>(dir: &mut Directory<K, V>, key: &K, tx: &InflightSender<V>) {
    if dir.inflight.get(key).is_some_and(|current| Arc::ptr_eq(current, tx)) {
        dir.inflight.remove(key);
    }
}

/// Clears the in-flight slot if the leader never published, e.g. when its
/// task was cancelled mid-fetch. Followers see `None` and retry.
struct InflightLeaderGuard<K: Hash + Eq, V> {
    directory: Arc<Mutex<Directory<K, V>>>,
    key: K,
    tx: InflightSender<V>,
    armed: bool,
}

impl<K: Hash + Eq, V> Drop for InflightLeaderGuard<K, V> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        release_own_slot(&mut lock(&self.directory), &self.key, &self.tx);
        let _ = self.tx.send(None);
    }
}

/// Bounded TTL + LRU cache in front of a slow upstream, with per-key
/// single-flight.
///
/// The directory mutex is only held to classify a lookup and to publish an
/// outcome; the fetch itself runs outside it. Concurrent misses for one key
/// share a `watch` channel and receive the leader's outcome, success or
/// failure. Failures are never stored.
pub struct UpstreamCache<K: Hash + Eq, V> {
    source_name: String,
    ttl: Duration,
    directory: Arc<Mutex<Directory<K, V>>>,
}

impl<K, V> UpstreamCache<K, V>
where
    K: Hash + Eq + Clone + std::fmt::Display + Send + 'static,
    V: Send + Sync + 'static,
{
    pub fn new(source_name: impl Into<String>, max_entries: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            source_name: source_name.into(),
            ttl,
            directory: Arc::new(Mutex::new(Directory {
                entries: LruCache::new(capacity),
                inflight: FxHashMap::default(),
            })),
        }
    }

    pub fn len(&self) -> usize {
        lock(&self.directory).entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn inflight_count(&self) -> usize {
        lock(&self.directory).inflight.len()
    }

    /// Looks up without fetching or touching recency.
    pub fn contains(&self, key: &K) -> bool {
        let dir = lock(&self.directory);
        dir.entries
            .peek(key)
            .is_some_and(|e| e.expires_at > Instant::now())
    }

    /// Returns the cached value for `key`, or runs `fetch` once for all
    /// concurrent callers of the same key. `fetch` is bounded by `timeout`.
    pub async fn get<F, Fut>(
        &self,
        key: K,
        timeout: Duration,
        fetch: F,
    ) -> Result<CacheHit<V>, DomainError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, DomainError>>,
    {
        loop {
            match self.register_or_join_inflight(&key) {
                Lookup::Hit(hit) => {
                    debug!(source = %self.source_name, key = %key, "Cache HIT");
                    return Ok(hit);
                }
                Lookup::Leader(tx) => return self.fetch_as_leader(key, tx, timeout, fetch).await,
                Lookup::Follower(rx) => {
                    if let Some(outcome) = Self::wait_as_follower(rx).await {
                        return outcome;
                    }
                    debug!(source = %self.source_name, key = %key, "Leader abandoned fetch, retrying");
                }
            }
        }
    }

    fn register_or_join_inflight(&self, key: &K) -> Lookup<V> {
        let mut dir = lock(&self.directory);
        let now = Instant::now();

        match dir.entries.get(key) {
            Some(entry) if entry.expires_at > now => {
                return Lookup::Hit(CacheHit {
                    value: Arc::clone(&entry.value),
                    remaining_ttl: entry.expires_at - now,
                });
            }
            Some(_) => {
                dir.entries.pop(key);
            }
            None => {}
        }

        if let Some(tx) = dir.inflight.get(key) {
            return Lookup::Follower(tx.subscribe());
        }

        let (tx, _rx) = watch::channel(None);
        let tx = Arc::new(tx);
        dir.inflight.insert(key.clone(), Arc::clone(&tx));
        Lookup::Leader(tx)
    }

    async fn wait_as_follower(mut rx: InflightReceiver<V>) -> Option<Outcome<V>> {
        let _ = rx.changed().await;
        let outcome = rx.borrow().clone();
        outcome
    }

    async fn fetch_as_leader<F, Fut>(
        &self,
        key: K,
        tx: InflightSender<V>,
        timeout: Duration,
        fetch: F,
    ) -> Result<CacheHit<V>, DomainError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, DomainError>>,
    {
        debug!(source = %self.source_name, key = %key, "Cache MISS");

        let mut guard = InflightLeaderGuard {
            directory: Arc::clone(&self.directory),
            key: key.clone(),
            tx,
            armed: true,
        };

        let outcome = match tokio::time::timeout(timeout, fetch()).await {
            Ok(Ok(value)) => Ok(CacheHit {
                value: Arc::new(value),
                remaining_ttl: self.ttl,
            }),
            Ok(Err(e)) => Err(self.as_upstream_error(e)),
            Err(_) => Err(DomainError::UpstreamTimeout {
                source_name: self.source_name.clone(),
                timeout_ms: timeout.as_millis() as u64,
            }),
        };

        {
            let mut dir = lock(&self.directory);
            if let Ok(hit) = &outcome {
                let entry = Entry {
                    value: Arc::clone(&hit.value),
                    expires_at: Instant::now() + self.ttl,
                };
                if let Some((evicted, _)) = dir.entries.push(key.clone(), entry) {
                    if evicted != key {
                        debug!(source = %self.source_name, key = %evicted, "Evicted LRU entry");
                    }
                }
            }
            release_own_slot(&mut dir, &key, &guard.tx);
            guard.armed = false;
        }

        let _ = guard.tx.send(Some(outcome.clone()));
        outcome
    }

    fn as_upstream_error(&self, error: DomainError) -> DomainError {
        match error.kind() {
            ErrorKind::Upstream => error,
            _ => DomainError::upstream(&self.source_name, error.to_string()),
        }
    }
}
