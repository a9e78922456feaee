//! Query cache with in-flight de-duplication and invalidation events
//!
//! Keeps the last good result of every remote query keyed by procedure path
//! and input, and tells subscribers when an entry changes.
//!
//! # Architecture
//!
//! ```text
//! Reader (feed view):
//!   1. cache.query("posts.getAll", fetcher)
//!      - fresh entry      → return cached value
//!      - fetch in flight  → join the shared future
//!      - stale / missing  → start fetcher, publish Updated when it lands
//!
//! Writer (composer, after a successful mutation):
//!   2. cache.invalidate("posts.getAll")
//!      - entry marked stale, in-flight fetch detached
//!      - Invalidated broadcast to every subscriber
//!      ↓
//! Subscriber (feed refresh task):
//!   3. receives Invalidated → calls query() again → refetch
//! ```
//!
//! A fetch that was already running when its key got invalidated can never
//! mark the entry fresh again, so the first read after an invalidation always
//! observes a new fetch.
//!
//! # Example
//!
//! ```
//! use query_cache::{build_query_key, CacheOptions, QueryCache};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let cache: QueryCache<Vec<String>, String> = QueryCache::new(CacheOptions::default());
//! let key = build_query_key("posts", "getAll");
//!
//! let posts = cache
//!     .query(&key, || async { Ok(vec!["hello".to_string()]) })
//!     .await
//!     .unwrap();
//! assert_eq!(posts, vec!["hello".to_string()]);
//!
//! assert!(cache.invalidate(&key));
//! assert!(cache.snapshot(&key).is_stale);
//! # }
//! ```

use chrono::{DateTime, Utc};
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

mod error;
pub mod helpers;
mod stats;

pub use error::QueryCacheError;
pub use helpers::{build_query_key, parse_query_key};
pub use stats::{QueryStats, StatsCollector};

type Result<T> = std::result::Result<T, QueryCacheError>;

/// Cache key: procedure path plus optional serialized input
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct QueryKey {
    path: String,
    input: Option<String>,
}

impl QueryKey {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            input: None,
        }
    }

    /// Attach serialized procedure input
    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.input = Some(input.into());
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn input(&self) -> Option<&str> {
        self.input.as_deref()
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.input {
            Some(input) => write!(f, "{}:{}", self.path, input),
            None => write!(f, "{}", self.path),
        }
    }
}

/// What happened to a cache entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CacheEventKind {
    Updated,     // Fresh data stored
    Invalidated, // Entry marked stale
    FetchFailed, // Fetch resolved with an error
}

/// Cache change notification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEvent {
    pub event_id: String,
    pub key: QueryKey,
    pub kind: CacheEventKind,
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl CacheEvent {
    fn new(key: QueryKey, kind: CacheEventKind, error: Option<String>) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            key,
            kind,
            error,
            timestamp: Utc::now(),
        }
    }

    /// Create new updated event
    pub fn updated(key: QueryKey) -> Self {
        Self::new(key, CacheEventKind::Updated, None)
    }

    /// Create new invalidated event
    pub fn invalidated(key: QueryKey) -> Self {
        Self::new(key, CacheEventKind::Invalidated, None)
    }

    /// Create new fetch failure event
    pub fn fetch_failed(key: QueryKey, error: String) -> Self {
        Self::new(key, CacheEventKind::FetchFailed, Some(error))
    }
}

/// Cache tuning
#[derive(Debug, Clone)]
pub struct CacheOptions {
    /// How long a fetched value is served without refetching
    pub stale_time: Duration,
    /// Events buffered per subscriber before it starts lagging
    pub event_capacity: usize,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            stale_time: Duration::ZERO,
            event_capacity: 64,
        }
    }
}

/// Point-in-time view of one entry
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySnapshot<V> {
    /// Last successfully fetched value, kept across errors and invalidation
    pub data: Option<V>,
    pub is_fetching: bool,
    pub is_stale: bool,
    /// Error of the most recent fetch, cleared by the next success
    pub error: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl<V> QuerySnapshot<V> {
    /// Snapshot of a key that was never queried
    pub fn idle() -> Self {
        Self {
            data: None,
            is_fetching: false,
            is_stale: true,
            error: None,
            updated_at: None,
        }
    }

    /// First load: fetching and nothing to show yet
    pub fn is_loading(&self) -> bool {
        self.is_fetching && self.data.is_none()
    }
}

type SharedFetch<V, E> = Shared<BoxFuture<'static, std::result::Result<V, E>>>;

struct InFlight<V, E> {
    id: u64,
    started: Instant,
    fetch: SharedFetch<V, E>,
}

struct Entry<V, E> {
    data: Option<V>,
    updated_at: Option<DateTime<Utc>>,
    fetched_at: Option<Instant>,
    invalidated: bool,
    error: Option<String>,
    in_flight: Option<InFlight<V, E>>,
}

impl<V, E> Default for Entry<V, E> {
    fn default() -> Self {
        Self {
            data: None,
            updated_at: None,
            fetched_at: None,
            invalidated: false,
            error: None,
            in_flight: None,
        }
    }
}

impl<V, E> Entry<V, E> {
    fn is_stale(&self, stale_time: Duration) -> bool {
        match self.fetched_at {
            Some(at) => self.invalidated || at.elapsed() >= stale_time,
            None => true,
        }
    }

    fn fresh_value(&self, stale_time: Duration) -> Option<&V> {
        if self.is_stale(stale_time) {
            None
        } else {
            self.data.as_ref()
        }
    }

    fn invalidate(&mut self) {
        self.invalidated = true;
        // Detach the running fetch: its result predates the invalidation
        self.in_flight = None;
    }
}

struct Inner<V, E> {
    entries: Mutex<HashMap<QueryKey, Entry<V, E>>>,
    /// Cache-wide so ids stay unique across `remove` / `clear`
    next_fetch_id: AtomicU64,
    events: broadcast::Sender<CacheEvent>,
    options: CacheOptions,
    stats: StatsCollector,
}

/// Shared query cache handle
///
/// Cloning is cheap; all clones see the same entries and events.
pub struct QueryCache<V, E> {
    inner: Arc<Inner<V, E>>,
}

impl<V, E> Clone for QueryCache<V, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V, E> QueryCache<V, E>
where
    V: Clone + Send + Sync + 'static,
    E: Clone + fmt::Display + Send + Sync + 'static,
{
    /// Create new cache
    pub fn new(options: CacheOptions) -> Self {
        let (events, _) = broadcast::channel(options.event_capacity.max(1));

        Self {
            inner: Arc::new(Inner {
                entries: Mutex::new(HashMap::new()),
                next_fetch_id: AtomicU64::new(0),
                events,
                options,
                stats: StatsCollector::new(),
            }),
        }
    }

    /// Read a query through the cache
    ///
    /// Returns the cached value while it is fresh. Otherwise joins the fetch
    /// already running for `key`, or starts `fetcher` if there is none.
    /// Concurrent callers share one fetch.
    pub async fn query<F, Fut>(&self, key: &QueryKey, fetcher: F) -> std::result::Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<V, E>> + Send + 'static,
    {
        let (fetch_id, fetch) = {
            let mut entries = self.inner.entries.lock();
            let entry = entries.entry(key.clone()).or_default();

            if let Some(value) = entry.fresh_value(self.inner.options.stale_time) {
                debug!(key = %key, "Query cache hit");
                self.inner.stats.record_hit();
                return Ok(value.clone());
            }

            match &entry.in_flight {
                Some(in_flight) => {
                    debug!(key = %key, fetch_id = in_flight.id, "Joining in-flight query");
                    self.inner.stats.record_dedup();
                    (in_flight.id, in_flight.fetch.clone())
                }
                None => {
                    let fetch_id = self.inner.next_fetch_id.fetch_add(1, Ordering::Relaxed);

                    debug!(key = %key, fetch_id, "Query cache miss, fetching");
                    self.inner.stats.record_miss();

                    let fetch = fetcher().boxed().shared();
                    entry.in_flight = Some(InFlight {
                        id: fetch_id,
                        started: Instant::now(),
                        fetch: fetch.clone(),
                    });
                    (fetch_id, fetch)
                }
            }
        };

        let result = fetch.await;
        self.complete(key, fetch_id, &result);
        result
    }

    /// Store the outcome of a fetch if it still owns the entry
    ///
    /// Every awaiter of a shared fetch calls this; only the first call for a
    /// fetch that was not detached by invalidation has any effect.
    fn complete(&self, key: &QueryKey, fetch_id: u64, result: &std::result::Result<V, E>) {
        let event = {
            let mut entries = self.inner.entries.lock();
            let Some(entry) = entries.get_mut(key) else {
                return;
            };

            let owns_entry = entry
                .in_flight
                .as_ref()
                .is_some_and(|in_flight| in_flight.id == fetch_id);
            if !owns_entry {
                return;
            }

            if let Some(in_flight) = entry.in_flight.take() {
                let latency = in_flight.started.elapsed();
                self.inner
                    .stats
                    .record_latency(latency.as_secs_f64() * 1000.0);
            }

            match result {
                Ok(value) => {
                    entry.data = Some(value.clone());
                    entry.updated_at = Some(Utc::now());
                    entry.fetched_at = Some(Instant::now());
                    entry.invalidated = false;
                    entry.error = None;

                    debug!(key = %key, fetch_id, "Query result stored");
                    CacheEvent::updated(key.clone())
                }
                Err(e) => {
                    self.inner.stats.record_fetch_error();
                    entry.error = Some(e.to_string());

                    warn!(key = %key, fetch_id, error = %e, "Query fetch failed");
                    CacheEvent::fetch_failed(key.clone(), e.to_string())
                }
            }
        };

        self.notify(event);
    }

    /// Current state of an entry without triggering a fetch
    pub fn snapshot(&self, key: &QueryKey) -> QuerySnapshot<V> {
        let entries = self.inner.entries.lock();

        match entries.get(key) {
            Some(entry) => QuerySnapshot {
                data: entry.data.clone(),
                is_fetching: entry.in_flight.is_some(),
                is_stale: entry.is_stale(self.inner.options.stale_time),
                error: entry.error.clone(),
                updated_at: entry.updated_at,
            },
            None => QuerySnapshot::idle(),
        }
    }

    /// Mark an entry stale so the next read refetches
    ///
    /// Returns false (and publishes nothing) when the key was never queried.
    pub fn invalidate(&self, key: &QueryKey) -> bool {
        let existed = match self.inner.entries.lock().get_mut(key) {
            Some(entry) => {
                entry.invalidate();
                true
            }
            None => false,
        };

        if existed {
            self.inner.stats.record_invalidation();
            info!(key = %key, "Query invalidated");
            self.notify(CacheEvent::invalidated(key.clone()));
        } else {
            debug!(key = %key, "Invalidation for unknown query ignored");
        }

        existed
    }

    /// Invalidate every entry matching `pattern`
    ///
    /// See [`helpers::matches_pattern`] for the pattern syntax.
    pub fn invalidate_pattern(&self, pattern: &str) -> usize {
        let keys: Vec<QueryKey> = {
            let mut entries = self.inner.entries.lock();
            entries
                .iter_mut()
                .filter(|(key, _)| helpers::matches_pattern(key, pattern))
                .map(|(key, entry)| {
                    entry.invalidate();
                    key.clone()
                })
                .collect()
        };

        info!(pattern = %pattern, count = keys.len(), "Queries invalidated by pattern");

        for key in &keys {
            self.inner.stats.record_invalidation();
            self.notify(CacheEvent::invalidated(key.clone()));
        }

        keys.len()
    }

    /// Drop an entry entirely
    pub fn remove(&self, key: &QueryKey) -> bool {
        self.inner.entries.lock().remove(key).is_some()
    }

    /// Drop all entries
    pub fn clear(&self) {
        self.inner.entries.lock().clear();
    }

    /// Subscribe to cache events
    pub fn subscribe(&self) -> Subscription {
        Subscription {
            receiver: self.inner.events.subscribe(),
        }
    }

    /// Number of live subscribers
    pub fn subscriber_count(&self) -> usize {
        self.inner.events.receiver_count()
    }

    /// Get current statistics snapshot
    pub fn stats(&self) -> QueryStats {
        self.inner.stats.snapshot()
    }

    /// Publish event, returns number of subscribers that received it
    fn notify(&self, event: CacheEvent) -> usize {
        debug!(
            event_id = %event.event_id,
            key = %event.key,
            kind = ?event.kind,
            "Publishing cache event"
        );

        // Sending only fails when nobody is subscribed
        self.inner.events.send(event).unwrap_or(0)
    }
}

/// Receiving side of cache events
pub struct Subscription {
    receiver: broadcast::Receiver<CacheEvent>,
}

impl Subscription {
    /// Wait for the next event
    pub async fn recv(&mut self) -> Result<CacheEvent> {
        self.receiver.recv().await.map_err(|e| match e {
            broadcast::error::RecvError::Lagged(missed) => {
                warn!(missed, "Cache subscriber lagged");
                QueryCacheError::Lagged(missed)
            }
            broadcast::error::RecvError::Closed => QueryCacheError::Closed,
        })
    }

    /// Take an already queued event without waiting
    pub fn try_recv(&mut self) -> Option<CacheEvent> {
        self.receiver.try_recv().ok()
    }
}
