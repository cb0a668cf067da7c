// ── Query binding ──
//
// A `Query<T>` is one observer of a cache entry. It owns its request state;
// the data itself lives in the shared `QueryClient`. Dropping the binding
// releases the observer. A fetch it started still completes and fills the
// cache, but the dropped binding's state is never written again.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use tokio::sync::watch;
use tokio::time::Instant;
use tokio_stream::wrappers::WatchStream;

use super::client::{Fetcher, Lookup, QueryClient, downcast};
use super::key::CacheKey;
use super::options::QueryOptions;
use super::state::RequestState;
use crate::error::CoreError;

pub struct Query<T> {
    client: QueryClient,
    key: CacheKey,
    options: QueryOptions,
    fetcher: Fetcher,
    state: watch::Sender<RequestState>,
    error: watch::Sender<Option<CoreError>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> fmt::Debug for Query<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("key", &self.key)
            .field("options", &self.options)
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

impl<T: Send + Sync + 'static> Query<T> {
    pub(crate) fn new(
        client: QueryClient,
        key: CacheKey,
        options: QueryOptions,
        fetcher: Fetcher,
    ) -> Self {
        client.observe(&key, Arc::clone(&fetcher), options.gc_time);
        let initial = if client.get_query_data::<T>(&key).is_some() {
            RequestState::Success
        } else {
            RequestState::Idle
        };
        let (state, _) = watch::channel(initial);
        let (error, _) = watch::channel(None);

        Self {
            client,
            key,
            options,
            fetcher,
            state,
            error,
            _marker: PhantomData,
        }
    }

    pub fn key(&self) -> &CacheKey {
        &self.key
    }

    pub fn options(&self) -> QueryOptions {
        self.options
    }

    /// Latest cached data for this key, fresh or not.
    pub fn data(&self) -> Option<Arc<T>> {
        self.client.get_query_data(&self.key)
    }

    pub fn state(&self) -> RequestState {
        *self.state.borrow()
    }

    /// Error of the last settled fetch, cleared by the next success.
    pub fn error(&self) -> Option<CoreError> {
        self.error.borrow().clone()
    }

    /// Fetching with nothing cached yet.
    pub fn is_loading(&self) -> bool {
        self.state().is_loading() && self.data().is_none()
    }

    /// Fetching while older data is still shown.
    pub fn is_refetching(&self) -> bool {
        self.state().is_loading() && self.data().is_some()
    }

    /// Return cached data when fresh, fetch otherwise.
    pub async fn fetch(&self) -> Result<Arc<T>, CoreError> {
        self.run(false).await
    }

    /// Always go to the network (joining a fetch already in flight).
    pub async fn refetch(&self) -> Result<Arc<T>, CoreError> {
        self.run(true).await
    }

    /// Stream of state transitions, starting with the current one.
    pub fn watch_state(&self) -> WatchStream<RequestState> {
        WatchStream::new(self.state.subscribe())
    }

    async fn run(&self, force: bool) -> Result<Arc<T>, CoreError> {
        let started = Instant::now();
        let result = match self.client.lookup(&self.key, &self.fetcher, self.options, force) {
            Lookup::Fresh(data) => Ok(data),
            Lookup::Pending(fut) => {
                self.state.send_replace(RequestState::Loading);
                fut.await
            }
        }
        .and_then(|data| downcast::<T>(&self.key, data));

        match result {
            Ok(ref _data) => {
                self.error.send_replace(None);
                self.state.send_replace(RequestState::Success);
            }
            Err(ref e) => {
                tracing::debug!(key = %self.key, elapsed = ?started.elapsed(), error = %e, "query failed");
                self.error.send_replace(Some(e.clone()));
                self.state.send_replace(RequestState::Error);
            }
        }
        result
    }
}

impl<T> Drop for Query<T> {
    fn drop(&mut self) {
        self.client.release(&self.key);
    }
}
