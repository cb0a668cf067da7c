// ── Mutation binding ──
//
// Wraps one write. On success the optional hook runs, then every configured
// key prefix is invalidated before `execute` resolves. On failure the error
// is returned unchanged and nothing is invalidated. No retries.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tracing::debug;

use super::client::QueryClient;
use super::key::CacheKey;
use super::state::RequestState;
use crate::error::CoreError;

type Operation<I, O> = Arc<dyn Fn(I) -> BoxFuture<'static, Result<O, CoreError>> + Send + Sync>;
type SuccessHook<O> = Arc<dyn Fn(&O) + Send + Sync>;

pub struct Mutation<I, O> {
    client: QueryClient,
    op: Operation<I, O>,
    invalidates: Vec<CacheKey>,
    on_success: Option<SuccessHook<O>>,
    state: watch::Sender<RequestState>,
    error: watch::Sender<Option<CoreError>>,
}

impl<I, O> fmt::Debug for Mutation<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mutation")
            .field("invalidates", &self.invalidates)
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

impl<I: Send + 'static, O: Send + 'static> Mutation<I, O> {
    pub fn new<F, Fut>(client: QueryClient, op: F) -> Self
    where
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O, CoreError>> + Send + 'static,
    {
        let (state, _) = watch::channel(RequestState::Idle);
        let (error, _) = watch::channel(None);
        Self {
            client,
            op: Arc::new(move |input| op(input).boxed()),
            invalidates: Vec::new(),
            on_success: None,
            state,
            error,
        }
    }

    /// Invalidate every query under `prefix` after a successful run.
    pub fn invalidates(mut self, prefix: CacheKey) -> Self {
        self.invalidates.push(prefix);
        self
    }

    pub fn on_success(mut self, hook: impl Fn(&O) + Send + Sync + 'static) -> Self {
        self.on_success = Some(Arc::new(hook));
        self
    }

    pub fn state(&self) -> RequestState {
        *self.state.borrow()
    }

    pub fn is_loading(&self) -> bool {
        self.state().is_loading()
    }

    pub fn error(&self) -> Option<CoreError> {
        self.error.borrow().clone()
    }

    pub fn watch_state(&self) -> WatchStream<RequestState> {
        WatchStream::new(self.state.subscribe())
    }

    pub async fn execute(&self, input: I) -> Result<O, CoreError> {
        self.error.send_replace(None);
        self.state.send_replace(RequestState::Loading);

        match (self.op)(input).await {
            Ok(output) => {
                if let Some(ref hook) = self.on_success {
                    hook(&output);
                }
                for prefix in &self.invalidates {
                    self.client.invalidate_queries(prefix).await;
                }
                self.state.send_replace(RequestState::Success);
                Ok(output)
            }
            Err(e) => {
                debug!(error = %e, "mutation failed");
                self.error.send_replace(Some(e.clone()));
                self.state.send_replace(RequestState::Error);
                Err(e)
            }
        }
    }
}
