//! In-memory query cache with LRU eviction.
//!
//! Entries are addressed by [`QueryKey`] and keep the last successful value
//! as JSON bytes beside the last error, so a failed refresh never throws
//! away data a caller could still show.
//!
//! Fetches run as spawned tasks wrapped in a shared future:
//! - concurrent reads of one key await the same task
//! - a reader that goes away does not cancel the fetch
//! - the task itself stores the outcome, so the last completion wins

use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use futures_util::future::{BoxFuture, FutureExt, Shared};
use lru::LruCache;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use eventdesk_core::cache::{
    decode, encode, QueryError, QueryEvent, QueryEventKind, QueryKey, QueryOptions,
    QuerySnapshot, QueryStatus, Result,
};

use super::subscription::Subscription;

/// Channel capacity for cache notifications.
const CHANNEL_CAPACITY: usize = 256;

type Bytes = Arc<Vec<u8>>;
type SharedFetch = Shared<BoxFuture<'static, Result<Bytes>>>;

struct InFlight {
    id: u64,
    future: SharedFetch,
}

/// A single cache entry.
struct Slot {
    value: Option<Bytes>,
    error: Option<QueryError>,
    updated_at: Option<DateTime<Utc>>,
    fetched_at: Option<Instant>,
    stale: bool,
    /// Bumped on every invalidation or direct write. A fetch that started
    /// under an older generation stores its value as stale.
    generation: u64,
    in_flight: Option<InFlight>,
    subscribers: usize,
    last_used: Instant,
}

impl Slot {
    fn new() -> Self {
        Self {
            value: None,
            error: None,
            updated_at: None,
            fetched_at: None,
            stale: true,
            generation: 0,
            in_flight: None,
            subscribers: 0,
            last_used: Instant::now(),
        }
    }

    fn status(&self) -> QueryStatus {
        if self.in_flight.is_some() {
            QueryStatus::Loading
        } else if self.error.is_some() {
            QueryStatus::Error
        } else {
            QueryStatus::Idle
        }
    }

    fn is_fresh(&self, stale_time: Duration) -> bool {
        !self.stale
            && self.error.is_none()
            && self
                .fetched_at
                .is_some_and(|fetched| fetched.elapsed() < stale_time)
    }

    /// Nobody observes the entry and no fetch is filling it.
    fn is_unpinned(&self) -> bool {
        self.subscribers == 0 && self.in_flight.is_none()
    }

    fn is_collectable(&self, gc_time: Duration) -> bool {
        self.is_unpinned() && self.last_used.elapsed() >= gc_time
    }

    fn touch(&mut self) {
        self.last_used = Instant::now();
    }
}

/// State behind the cache lock.
///
/// The LRU itself is unbounded; `capacity` is enforced on insert so that
/// pinned entries are never evicted.
pub(super) struct Store {
    slots: LruCache<QueryKey, Slot>,
    capacity: usize,
    next_fetch: u64,
}

impl Store {
    /// Gets the slot for `key`, creating it when missing. Creating a slot
    /// at capacity evicts the least recently used unpinned entries; when
    /// every entry is pinned the store grows past its capacity instead.
    fn slot_mut(&mut self, key: &QueryKey) -> &mut Slot {
        if !self.slots.contains(key) {
            self.make_room();
        }
        self.slots.get_or_insert_mut(key.clone(), Slot::new)
    }

    fn make_room(&mut self) {
        while self.slots.len() >= self.capacity {
            let victim = self
                .slots
                .iter()
                .rev()
                .find(|(_, slot)| slot.is_unpinned())
                .map(|(key, _)| key.clone());

            match victim {
                Some(key) => {
                    self.slots.pop(&key);
                    tracing::trace!(key = %key, "Evicted query");
                }
                None => {
                    tracing::debug!(entries = self.slots.len(), "Every query is pinned, growing past capacity");
                    break;
                }
            }
        }
    }

    /// Drops one subscriber from a key and restarts its GC grace period.
    pub(super) fn release(&mut self, key: &QueryKey) {
        if let Some(slot) = self.slots.peek_mut(key) {
            slot.subscribers = slot.subscribers.saturating_sub(1);
            slot.touch();
        }
    }
}

/// Locks the store. The lock is never held across an await, so a poisoned
/// mutex only means a panic elsewhere and the data is still consistent.
pub(super) fn lock(store: &Mutex<Store>) -> MutexGuard<'_, Store> {
    store.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Key-addressed async query cache.
///
/// Cheap to clone; clones share the same store. Construct one per process
/// and hand it to the services that need it.
#[derive(Clone)]
pub struct QueryCache {
    store: Arc<Mutex<Store>>,
    events: broadcast::Sender<QueryEvent>,
    options: Arc<QueryOptions>,
}

impl QueryCache {
    /// Creates an empty cache.
    ///
    /// A `max_entries` of zero is treated as one.
    pub fn new(options: QueryOptions) -> Self {
        let (events, _) = broadcast::channel(CHANNEL_CAPACITY);

        Self {
            store: Arc::new(Mutex::new(Store {
                slots: LruCache::unbounded(),
                capacity: options.max_entries.max(1),
                next_fetch: 0,
            })),
            events,
            options: Arc::new(options),
        }
    }

    pub fn options(&self) -> &QueryOptions {
        &self.options
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        lock(&self.store).slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        lock(&self.store).slots.contains(key)
    }

    /// Reads a key, fetching it when the cached value is missing or stale.
    ///
    /// Concurrent calls for the same key share one fetch. A failed fetch
    /// keeps the previous value in the snapshot with the error beside it.
    pub async fn read<T, F, Fut, E>(&self, key: &QueryKey, fetcher: F) -> QuerySnapshot<T>
    where
        T: Serialize + DeserializeOwned + Send + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<T, E>> + Send + 'static,
        E: Into<QueryError> + Send + 'static,
    {
        let outcome = match self.start(key, fetcher) {
            Some(fetch) => Some(fetch.await),
            None => None,
        };

        let mut snapshot = self.peek(key);

        // The entry can disappear while the fetch runs (remove, eviction);
        // the awaited outcome still answers this caller.
        if snapshot.data.is_none() && snapshot.error.is_none() {
            match outcome {
                Some(Ok(bytes)) => match decode(&bytes) {
                    Ok(data) => snapshot.data = Some(data),
                    Err(error) => snapshot.error = Some(error),
                },
                Some(Err(error)) => snapshot.error = Some(error),
                None => {}
            }
        }

        snapshot
    }

    /// Like [`read`](Self::read), but as a plain result: the value when one
    /// is available (even if stale), the error otherwise.
    pub async fn fetch<T, F, Fut, E>(&self, key: &QueryKey, fetcher: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned + Send + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<T, E>> + Send + 'static,
        E: Into<QueryError> + Send + 'static,
    {
        self.read(key, fetcher).await.into_result()
    }

    /// Starts a background fetch unless the value is fresh. Returns true
    /// when a fetch is running for the key afterwards.
    pub fn prefetch<T, F, Fut, E>(&self, key: &QueryKey, fetcher: F) -> bool
    where
        T: Serialize + DeserializeOwned + Send + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<T, E>> + Send + 'static,
        E: Into<QueryError> + Send + 'static,
    {
        self.start(key, fetcher).is_some()
    }

    /// Returns the current state of a key without fetching.
    pub fn peek<T: DeserializeOwned>(&self, key: &QueryKey) -> QuerySnapshot<T> {
        let (value, mut snapshot) = {
            let mut store = lock(&self.store);
            let Some(slot) = store.slots.get_mut(key) else {
                return QuerySnapshot::empty();
            };
            slot.touch();

            let snapshot = QuerySnapshot {
                data: None,
                error: slot.error.clone(),
                status: slot.status(),
                is_stale: !slot.is_fresh(self.options.stale_time),
                updated_at: slot.updated_at,
            };
            (slot.value.clone(), snapshot)
        };

        if let Some(bytes) = value {
            match decode(&bytes) {
                Ok(data) => snapshot.data = Some(data),
                Err(error) => {
                    tracing::warn!(key = %key, error = %error, "Cached value failed to decode");
                    snapshot.error.get_or_insert(error);
                }
            }
        }

        snapshot
    }

    /// Marks every entry under `prefix` stale. Returns how many matched.
    ///
    /// A fetch already running for a matching key is detached: it still
    /// stores its value when it finishes, but the entry stays stale and the
    /// next read starts a new fetch.
    pub fn invalidate(&self, prefix: &QueryKey) -> usize {
        let keys: Vec<QueryKey> = {
            let mut store = lock(&self.store);
            store
                .slots
                .iter_mut()
                .filter(|(key, _)| key.starts_with(prefix))
                .map(|(key, slot)| {
                    slot.stale = true;
                    slot.generation += 1;
                    slot.in_flight = None;
                    key.clone()
                })
                .collect()
        };

        tracing::debug!(prefix = %prefix, count = keys.len(), "Invalidated queries");
        for key in &keys {
            self.notify(key, QueryEventKind::Invalidated);
        }
        keys.len()
    }

    /// Stores a value directly, without a fetch.
    pub fn write<T: Serialize>(&self, key: &QueryKey, value: &T) -> Result<()> {
        let bytes = Arc::new(encode(value)?);
        {
            let mut store = lock(&self.store);
            let slot = store.slot_mut(key);
            slot.value = Some(bytes);
            slot.error = None;
            slot.updated_at = Some(Utc::now());
            slot.fetched_at = Some(Instant::now());
            slot.stale = false;
            slot.generation += 1;
            slot.in_flight = None;
            slot.touch();
        }

        tracing::trace!(key = %key, "Wrote query value");
        self.notify(key, QueryEventKind::Updated);
        Ok(())
    }

    /// Drops every entry under `prefix`. Returns how many were removed.
    pub fn remove(&self, prefix: &QueryKey) -> usize {
        let keys: Vec<QueryKey> = {
            let mut store = lock(&self.store);
            let keys: Vec<QueryKey> = store
                .slots
                .iter()
                .filter(|(key, _)| key.starts_with(prefix))
                .map(|(key, _)| key.clone())
                .collect();
            for key in &keys {
                store.slots.pop(key);
            }
            keys
        };

        for key in &keys {
            self.notify(key, QueryEventKind::Removed);
        }
        keys.len()
    }

    /// Observes a key. The entry is kept from garbage collection until the
    /// returned guard is dropped.
    pub fn subscribe(&self, key: &QueryKey) -> Subscription {
        {
            let mut store = lock(&self.store);
            let slot = store.slot_mut(key);
            slot.subscribers += 1;
            slot.touch();
        }

        Subscription::new(key.clone(), Arc::clone(&self.store), self.events.subscribe())
    }

    /// Removes entries nobody observes that have been idle for longer than
    /// `gc_time`. Entries with a fetch in flight are kept.
    pub fn collect_garbage(&self) -> usize {
        let gc_time = self.options.gc_time;
        let keys: Vec<QueryKey> = {
            let mut store = lock(&self.store);
            let keys: Vec<QueryKey> = store
                .slots
                .iter()
                .filter(|(_, slot)| slot.is_collectable(gc_time))
                .map(|(key, _)| key.clone())
                .collect();
            for key in &keys {
                store.slots.pop(key);
            }
            keys
        };

        if !keys.is_empty() {
            tracing::debug!(count = keys.len(), "Collected idle queries");
        }
        for key in &keys {
            self.notify(key, QueryEventKind::Removed);
        }
        keys.len()
    }

    /// Runs [`collect_garbage`](Self::collect_garbage) on an interval until
    /// the returned handle is aborted.
    pub fn spawn_gc(&self, interval: Duration) -> JoinHandle<()> {
        let cache = self.clone();
        let interval = interval.max(Duration::from_millis(1));

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                cache.collect_garbage();
            }
        })
    }

    /// Joins the running fetch for `key`, starts one if the entry is not
    /// fresh, or returns `None` on a fresh hit.
    fn start<T, F, Fut, E>(&self, key: &QueryKey, fetcher: F) -> Option<SharedFetch>
    where
        T: Serialize + DeserializeOwned + Send + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<T, E>> + Send + 'static,
        E: Into<QueryError> + Send + 'static,
    {
        let future = {
            let mut store = lock(&self.store);
            let fetch_id = store.next_fetch;
            let slot = store.slot_mut(key);
            slot.touch();

            if let Some(in_flight) = &slot.in_flight {
                tracing::trace!(key = %key, "Joining in-flight fetch");
                return Some(in_flight.future.clone());
            }
            if slot.is_fresh(self.options.stale_time) {
                tracing::trace!(key = %key, "Cache hit");
                return None;
            }

            tracing::trace!(key = %key, "Cache miss");
            let future = self.spawn_fetch(key.clone(), fetch_id, slot.generation, fetcher);
            slot.in_flight = Some(InFlight {
                id: fetch_id,
                future: future.clone(),
            });
            store.next_fetch += 1;
            future
        };

        self.notify(key, QueryEventKind::Loading);
        Some(future)
    }

    fn spawn_fetch<T, F, Fut, E>(
        &self,
        key: QueryKey,
        fetch_id: u64,
        generation: u64,
        fetcher: F,
    ) -> SharedFetch
    where
        T: Serialize + DeserializeOwned + Send + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<T, E>> + Send + 'static,
        E: Into<QueryError> + Send + 'static,
    {
        let cache = self.clone();
        let options = Arc::clone(&self.options);

        // The inner task isolates a panicking fetcher; the outer one always
        // gets to record the outcome.
        let task: JoinHandle<Result<Bytes>> = tokio::spawn(async move {
            let attempts = tokio::spawn(run_fetch(fetcher, options, key.clone()));
            let outcome = match attempts.await {
                Ok(outcome) => outcome,
                Err(err) => Err(QueryError::Aborted(err.to_string())),
            };
            cache.complete(&key, fetch_id, generation, &outcome);
            outcome
        });

        async move {
            match task.await {
                Ok(outcome) => outcome,
                Err(err) => Err(QueryError::Aborted(err.to_string())),
            }
        }
        .boxed()
        .shared()
    }

    fn complete(&self, key: &QueryKey, fetch_id: u64, generation: u64, outcome: &Result<Bytes>) {
        let kind = {
            let mut store = lock(&self.store);
            let Some(slot) = store.slots.peek_mut(key) else {
                tracing::trace!(key = %key, "Dropping fetch result for removed entry");
                return;
            };

            if slot.in_flight.as_ref().is_some_and(|f| f.id == fetch_id) {
                slot.in_flight = None;
            }
            slot.touch();

            match outcome {
                Ok(bytes) => {
                    slot.value = Some(Arc::clone(bytes));
                    slot.error = None;
                    slot.updated_at = Some(Utc::now());
                    slot.fetched_at = Some(Instant::now());
                    slot.stale = slot.generation != generation;
                    QueryEventKind::Updated
                }
                Err(error) => {
                    slot.error = Some(error.clone());
                    QueryEventKind::Failed(error.clone())
                }
            }
        };

        if let QueryEventKind::Failed(error) = &kind {
            tracing::warn!(key = %key, error = %error, "Query fetch failed");
        }
        self.notify(key, kind);
    }

    fn notify(&self, key: &QueryKey, kind: QueryEventKind) {
        // No receivers is fine.
        let _ = self.events.send(QueryEvent::new(key.clone(), kind));
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(QueryOptions::default())
    }
}

impl fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryCache")
            .field("entries", &self.len())
            .field("options", &self.options)
            .finish()
    }
}

/// Runs a fetcher with the configured timeout, retrying retryable failures
/// with exponential backoff.
async fn run_fetch<T, F, Fut, E>(fetcher: F, options: Arc<QueryOptions>, key: QueryKey) -> Result<Bytes>
where
    T: Serialize,
    F: Fn() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
    E: Into<QueryError>,
{
    let timeout_ms = u64::try_from(options.fetch_timeout.as_millis()).unwrap_or(u64::MAX);
    let mut attempt = 0;

    loop {
        let outcome = match tokio::time::timeout(options.fetch_timeout, fetcher()).await {
            Ok(Ok(value)) => encode(&value).map(Arc::new),
            Ok(Err(err)) => Err(err.into()),
            Err(_) => Err(QueryError::Timeout(timeout_ms)),
        };

        match outcome {
            Err(error) if error.is_retryable() && attempt < options.retry => {
                attempt += 1;
                let delay = options.backoff(attempt);
                tracing::debug!(key = %key, attempt, ?delay, error = %error, "Retrying query fetch");
                tokio::time::sleep(delay).await;
            }
            outcome => return outcome,
        }
    }
}
