// ── Query client ──
//
// Shared cache behind every `Query`. Entries are keyed by `CacheKey` and
// hold type-erased data. At most one fetch per key runs at a time; readers
// arriving while it runs await the same shared future. Fetches run as
// spawned tasks so a result always lands in the cache even when every
// waiting binding has been dropped.

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use futures_util::future::{BoxFuture, FutureExt, Shared, join_all};
use tokio::time::Instant;
use tracing::{debug, trace, warn};

use super::key::CacheKey;
use super::options::QueryOptions;
use super::query::Query;
use crate::error::CoreError;

pub(crate) type AnyData = Arc<dyn Any + Send + Sync>;
pub(crate) type Fetcher =
    Arc<dyn Fn() -> BoxFuture<'static, Result<AnyData, CoreError>> + Send + Sync>;
pub(crate) type SharedFetch = Shared<BoxFuture<'static, Result<AnyData, CoreError>>>;

/// Outcome of looking a key up before reading it.
pub(crate) enum Lookup {
    Fresh(AnyData),
    Pending(SharedFetch),
}

struct InFlight {
    id: u64,
    epoch: u64,
    fut: SharedFetch,
}

struct Entry {
    data: Option<AnyData>,
    updated_at: Option<Instant>,
    /// Bumped by every invalidation.
    epoch: u64,
    /// Epoch the current data was fetched under.
    data_epoch: u64,
    in_flight: Option<InFlight>,
    next_fetch_id: u64,
    observers: usize,
    released_at: Option<Instant>,
    gc_time: Duration,
    /// Refetch hook of the live observers, used after invalidation.
    fetcher: Option<Fetcher>,
}

impl Entry {
    fn new(now: Instant, gc_time: Duration) -> Self {
        Self {
            data: None,
            updated_at: None,
            epoch: 0,
            data_epoch: 0,
            in_flight: None,
            next_fetch_id: 0,
            observers: 0,
            released_at: Some(now),
            gc_time,
            fetcher: None,
        }
    }

    fn fresh(&self, now: Instant, stale_time: Duration) -> Option<AnyData> {
        let updated_at = self.updated_at?;
        if self.data_epoch != self.epoch || now.duration_since(updated_at) >= stale_time {
            return None;
        }
        self.data.clone()
    }

    fn collectable(&self, now: Instant) -> bool {
        self.observers == 0
            && self.in_flight.is_none()
            && self
                .released_at
                .is_some_and(|t| now.duration_since(t) >= self.gc_time)
    }
}

struct ClientInner {
    entries: DashMap<CacheKey, Entry>,
    defaults: QueryOptions,
}

impl ClientInner {
    fn complete(&self, key: &CacheKey, id: u64, epoch: u64, result: &Result<AnyData, CoreError>) {
        let Some(mut entry) = self.entries.get_mut(key) else {
            return;
        };
        if entry.in_flight.as_ref().is_some_and(|f| f.id == id) {
            entry.in_flight = None;
        }
        if entry.observers == 0 {
            entry.released_at = Some(Instant::now());
        }
        match result {
            // A fetch that started before the latest invalidation only
            // fills an empty entry; it never makes stale data look fresh.
            Ok(data) if epoch == entry.epoch || entry.data.is_none() => {
                entry.data = Some(Arc::clone(data));
                entry.updated_at = Some(Instant::now());
                entry.data_epoch = epoch;
            }
            Ok(_) => trace!(%key, "discarding superseded fetch result"),
            Err(e) => debug!(%key, error = %e, "query fetch failed"),
        }
    }
}

/// Keyed cache of backend reads. Cheap to clone.
#[derive(Clone)]
pub struct QueryClient {
    inner: Arc<ClientInner>,
}

impl fmt::Debug for QueryClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryClient")
            .field("entries", &self.inner.entries.len())
            .field("defaults", &self.inner.defaults)
            .finish()
    }
}

impl Default for QueryClient {
    fn default() -> Self {
        Self::new(QueryOptions::default())
    }
}

impl QueryClient {
    pub fn new(defaults: QueryOptions) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                entries: DashMap::new(),
                defaults,
            }),
        }
    }

    pub fn defaults(&self) -> QueryOptions {
        self.inner.defaults
    }

    // ── Bindings ─────────────────────────────────────────────────────

    /// Bind a long-lived query with the client's default options.
    pub fn query<T, F, Fut>(&self, key: CacheKey, fetcher: F) -> Query<T>
    where
        T: Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, CoreError>> + Send + 'static,
    {
        self.query_with(key, self.inner.defaults, fetcher)
    }

    pub fn query_with<T, F, Fut>(&self, key: CacheKey, options: QueryOptions, fetcher: F) -> Query<T>
    where
        T: Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, CoreError>> + Send + 'static,
    {
        Query::new(self.clone(), key, options, erase(fetcher))
    }

    /// One-shot read: served from cache when fresh, fetched otherwise.
    /// Registers no observer, so the entry is collectable once `gc_time`
    /// passes.
    pub async fn fetch_query<T, F, Fut>(&self, key: &CacheKey, fetcher: F) -> Result<Arc<T>, CoreError>
    where
        T: Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, CoreError>> + Send + 'static,
    {
        let fetcher = erase(fetcher);
        let data = match self.lookup(key, &fetcher, self.inner.defaults, false) {
            Lookup::Fresh(data) => data,
            Lookup::Pending(fut) => fut.await?,
        };
        downcast(key, data)
    }

    // ── Direct cache access ──────────────────────────────────────────

    /// Cached data for `key`, fresh or not.
    pub fn get_query_data<T: Send + Sync + 'static>(&self, key: &CacheKey) -> Option<Arc<T>> {
        let data = self.inner.entries.get(key)?.data.clone()?;
        data.downcast::<T>().ok()
    }

    /// Seed or overwrite the cached data for `key`. Counts as a fresh fetch.
    pub fn set_query_data<T: Send + Sync + 'static>(&self, key: CacheKey, data: T) {
        let now = Instant::now();
        let mut entry = self
            .inner
            .entries
            .entry(key)
            .or_insert_with(|| Entry::new(now, self.inner.defaults.gc_time));
        entry.data = Some(Arc::new(data));
        entry.updated_at = Some(now);
        entry.data_epoch = entry.epoch;
    }

    /// `true` when the next read of `key` would hit the network.
    pub fn is_stale(&self, key: &CacheKey) -> bool {
        self.inner.entries.get(key).is_none_or(|e| {
            e.fresh(Instant::now(), self.inner.defaults.stale_time)
                .is_none()
        })
    }

    pub fn is_fetching(&self, key: &CacheKey) -> bool {
        self.inner
            .entries
            .get(key)
            .is_some_and(|e| e.in_flight.is_some())
    }

    pub fn observer_count(&self, key: &CacheKey) -> usize {
        self.inner.entries.get(key).map_or(0, |e| e.observers)
    }

    pub fn len(&self) -> usize {
        self.inner.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.entries.is_empty()
    }

    // ── Invalidation ─────────────────────────────────────────────────

    /// Mark every entry under `prefix` stale.
    ///
    /// Entries with live observers are refetched right away and this call
    /// resolves once those refetches settle. Refetch failures are logged;
    /// the affected entries stay stale. Returns the number of entries
    /// invalidated.
    pub async fn invalidate_queries(&self, prefix: &CacheKey) -> usize {
        let mut count = 0;
        let mut refetch = Vec::new();

        for mut entry in self.inner.entries.iter_mut() {
            if !entry.key().starts_with(prefix) {
                continue;
            }
            count += 1;
            entry.epoch += 1;
            if entry.observers == 0 {
                continue;
            }
            if let Some(ref fetcher) = entry.fetcher {
                refetch.push((entry.key().clone(), Arc::clone(fetcher)));
            }
        }

        debug!(%prefix, count, refetching = refetch.len(), "invalidated queries");

        let defaults = self.inner.defaults;
        let pending = refetch.iter().map(|(key, fetcher)| {
            let lookup = self.lookup(key, fetcher, defaults, true);
            async move {
                match lookup {
                    Lookup::Fresh(_) => Ok(()),
                    Lookup::Pending(fut) => fut.await.map(|_| ()),
                }
            }
        });
        let results = join_all(pending).await;

        for ((key, _), result) in refetch.iter().zip(results) {
            if let Err(e) = result {
                warn!(%key, error = %e, "refetch after invalidation failed");
            }
        }
        count
    }

    /// Drop every unobserved entry under `prefix`, returning how many went.
    pub fn remove_queries(&self, prefix: &CacheKey) -> usize {
        let mut removed = 0;
        self.inner.entries.retain(|key, entry| {
            let drop = key.starts_with(prefix) && entry.observers == 0;
            removed += usize::from(drop);
            !drop
        });
        removed
    }

    /// Evict entries nobody has observed for longer than their `gc_time`.
    pub fn collect_garbage(&self) -> usize {
        let now = Instant::now();
        let mut evicted = 0;
        self.inner.entries.retain(|_, entry| {
            let drop = entry.collectable(now);
            evicted += usize::from(drop);
            !drop
        });
        if evicted > 0 {
            debug!(evicted, remaining = self.inner.entries.len(), "query cache collected");
        }
        evicted
    }

    // ── Internals used by bindings ───────────────────────────────────

    pub(crate) fn lookup(
        &self,
        key: &CacheKey,
        fetcher: &Fetcher,
        options: QueryOptions,
        force: bool,
    ) -> Lookup {
        let now = Instant::now();
        let mut entry = self
            .inner
            .entries
            .entry(key.clone())
            .or_insert_with(|| Entry::new(now, options.gc_time));
        // Unobserved entries age from their last use.
        if entry.observers == 0 {
            entry.released_at = Some(now);
        }

        if !force {
            if let Some(data) = entry.fresh(now, options.stale_time) {
                trace!(%key, "query served from cache");
                return Lookup::Fresh(data);
            }
        }

        if let Some(ref flight) = entry.in_flight {
            if flight.epoch == entry.epoch {
                trace!(%key, "joining in-flight fetch");
                return Lookup::Pending(flight.fut.clone());
            }
        }

        let id = entry.next_fetch_id;
        entry.next_fetch_id += 1;
        let epoch = entry.epoch;
        let fut = self.spawn_fetch(key.clone(), id, epoch, Arc::clone(fetcher));
        entry.in_flight = Some(InFlight {
            id,
            epoch,
            fut: fut.clone(),
        });
        Lookup::Pending(fut)
    }

    fn spawn_fetch(&self, key: CacheKey, id: u64, epoch: u64, fetcher: Fetcher) -> SharedFetch {
        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move {
            debug!(%key, "fetching query");
            let result = fetcher().await;
            inner.complete(&key, id, epoch, &result);
            result
        });

        async move {
            handle
                .await
                .unwrap_or_else(|e| Err(CoreError::Internal(format!("query task failed: {e}"))))
        }
        .boxed()
        .shared()
    }

    pub(crate) fn observe(&self, key: &CacheKey, fetcher: Fetcher, gc_time: Duration) {
        let mut entry = self
            .inner
            .entries
            .entry(key.clone())
            .or_insert_with(|| Entry::new(Instant::now(), gc_time));
        entry.observers += 1;
        entry.released_at = None;
        entry.gc_time = entry.gc_time.max(gc_time);
        entry.fetcher = Some(fetcher);
    }

    pub(crate) fn release(&self, key: &CacheKey) {
        if let Some(mut entry) = self.inner.entries.get_mut(key) {
            entry.observers = entry.observers.saturating_sub(1);
            if entry.observers == 0 {
                entry.released_at = Some(Instant::now());
                entry.fetcher = None;
            }
        }
    }
}

pub(crate) fn erase<T, F, Fut>(fetcher: F) -> Fetcher
where
    T: Send + Sync + 'static,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, CoreError>> + Send + 'static,
{
    Arc::new(move || {
        let fut = fetcher();
        async move { fut.await.map(|value| Arc::new(value) as AnyData) }.boxed()
    })
}

pub(crate) fn downcast<T: Send + Sync + 'static>(
    key: &CacheKey,
    data: AnyData,
) -> Result<Arc<T>, CoreError> {
    data.downcast::<T>()
        .map_err(|_| CoreError::Internal(format!("query {key} holds a different type")))
}
