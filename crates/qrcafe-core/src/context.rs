// ── Application context ──
//
// Explicit replacement for process-wide singletons: built once from a
// `CoreConfig`, cloned wherever it is needed, torn down with `shutdown()`.
// It owns the HTTP client (through the repositories), the listing cache
// connection, the query client and the background GC task.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use qrcafe_api::{CafeRepository, CategoryRepository, MenuRepository, ProductRepository};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cache::{
    CacheInvalidator, InvalidationOutcome, ListingCache, RedisListingCache, cafes_listing_key,
};
use crate::command::{Command, CommandResult};
use crate::config::CoreConfig;
use crate::error::CoreError;
use crate::keys;
use crate::model::{Cafe, Category, Product, PublicMenu};
use crate::query::{CacheKey, Mutation, Query, QueryClient};

/// Typed repositories sharing one HTTP client.
#[derive(Debug, Clone)]
pub(crate) struct Repositories {
    pub cafes: CafeRepository,
    pub categories: CategoryRepository,
    pub products: ProductRepository,
    pub menu: MenuRepository,
}

impl Repositories {
    fn new(http: &reqwest::Client, base_url: &url::Url) -> Self {
        Self {
            cafes: CafeRepository::new(http.clone(), base_url),
            categories: CategoryRepository::new(http.clone(), base_url),
            products: ProductRepository::new(http.clone(), base_url),
            menu: MenuRepository::new(http.clone(), base_url),
        }
    }
}

/// Cheaply cloneable handle on everything a consumer needs.
#[derive(Clone)]
pub struct AppContext {
    inner: Arc<ContextInner>,
}

struct ContextInner {
    config: CoreConfig,
    repos: Repositories,
    queries: QueryClient,
    invalidator: CacheInvalidator,
    listing_cache: Option<Arc<dyn ListingCache>>,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl fmt::Debug for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext")
            .field("api_url", &self.inner.config.api_url.as_str())
            .field("user_id", &self.inner.config.user_id)
            .field("listing_cache", &self.inner.listing_cache.is_some())
            .field("queries", &self.inner.queries)
            .finish_non_exhaustive()
    }
}

impl AppContext {
    // ── Lifecycle ────────────────────────────────────────────────────

    /// Open the listing cache named by `config.cache_url` (if any) and start
    /// the context.
    ///
    /// An unreachable cache is not fatal: the context starts without one
    /// and cafe writes report `InvalidationOutcome::Skipped`.
    pub async fn connect(config: CoreConfig) -> Result<Self, CoreError> {
        let cache: Option<Arc<dyn ListingCache>> = match config.cache_url.as_deref() {
            Some(url) => match RedisListingCache::connect(url).await {
                Ok(cache) => Some(Arc::new(cache)),
                Err(e @ CoreError::Configuration { .. }) => return Err(e),
                Err(e) => {
                    warn!(error = %e, "listing cache unavailable, continuing without it");
                    None
                }
            },
            None => None,
        };
        Self::start(config, cache)
    }

    /// Start with an explicit listing cache. Must run inside a Tokio
    /// runtime because it spawns the GC task.
    pub fn start(
        config: CoreConfig,
        listing_cache: Option<Arc<dyn ListingCache>>,
    ) -> Result<Self, CoreError> {
        let http = config.transport().build_client()?;
        let repos = Repositories::new(&http, &config.api_url);
        let queries = QueryClient::new(config.query);
        let invalidator = CacheInvalidator::new(listing_cache.clone());
        let cancel = CancellationToken::new();

        let mut handles = Vec::new();
        if !config.gc_interval.is_zero() {
            handles.push(tokio::spawn(gc_task(
                queries.clone(),
                config.gc_interval,
                cancel.clone(),
            )));
        }

        info!(
            api_url = %config.api_url,
            user_id = ?config.user_id,
            listing_cache = listing_cache.is_some(),
            "context started"
        );

        Ok(Self {
            inner: Arc::new(ContextInner {
                config,
                repos,
                queries,
                invalidator,
                listing_cache,
                cancel,
                task_handles: Mutex::new(handles),
            }),
        })
    }

    /// Stop background tasks and wait for them to finish.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();
        let handles: Vec<_> = self.inner.task_handles.lock().await.drain(..).collect();
        let failed = join_tasks(handles).await;
        debug!(failed, "context shut down");
    }

    pub fn config(&self) -> &CoreConfig {
        &self.inner.config
    }

    pub fn queries(&self) -> &QueryClient {
        &self.inner.queries
    }

    pub fn invalidator(&self) -> &CacheInvalidator {
        &self.inner.invalidator
    }

    /// The acting user, required for cafe listings and cafe writes.
    pub fn user_id(&self) -> Result<i64, CoreError> {
        self.inner.config.user_id.ok_or_else(|| CoreError::Configuration {
            message: "no user id configured".into(),
        })
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Cafes of the acting user, in display order.
    pub async fn cafes(&self) -> Result<Arc<Vec<Cafe>>, CoreError> {
        let user_id = self.user_id()?;
        self.read(keys::cafes(user_id), move |ctx| async move {
            ctx.load_cafes(user_id).await
        })
        .await
    }

    pub async fn cafe(&self, id: i64) -> Result<Arc<Cafe>, CoreError> {
        self.read(keys::cafe(id), move |ctx| async move {
            Ok::<_, CoreError>(Cafe::from(ctx.inner.repos.cafes.get(id).await?))
        })
        .await
    }

    pub async fn categories(&self, cafe_id: i64) -> Result<Arc<Vec<Category>>, CoreError> {
        self.read(keys::categories(cafe_id), move |ctx| async move {
            ctx.load_categories(cafe_id).await
        })
        .await
    }

    pub async fn category(&self, id: i64) -> Result<Arc<Category>, CoreError> {
        self.read(keys::category(id), move |ctx| async move {
            Ok::<_, CoreError>(Category::from(ctx.inner.repos.categories.get(id).await?))
        })
        .await
    }

    pub async fn products(&self, category_id: i64) -> Result<Arc<Vec<Product>>, CoreError> {
        self.read(keys::products(category_id), move |ctx| async move {
            ctx.load_products(category_id).await
        })
        .await
    }

    pub async fn product(&self, id: i64) -> Result<Arc<Product>, CoreError> {
        self.read(keys::product(id), move |ctx| async move {
            Ok::<_, CoreError>(Product::from(ctx.inner.repos.products.get(id).await?))
        })
        .await
    }

    /// Guest-facing menu by slug, unavailable products hidden.
    pub async fn public_menu(&self, slug: &str) -> Result<Arc<PublicMenu>, CoreError> {
        let slug = slug.trim().to_owned();
        self.read(keys::menu(&slug), move |ctx| {
            let slug = slug.clone();
            async move { Ok::<_, CoreError>(PublicMenu::from(ctx.inner.repos.menu.by_slug(&slug).await?)) }
        })
        .await
    }

    // ── Long-lived bindings ──────────────────────────────────────────

    /// Observed cafe listing. Refetched automatically after cafe writes.
    pub fn cafes_query(&self) -> Result<Query<Vec<Cafe>>, CoreError> {
        let user_id = self.user_id()?;
        Ok(self.bind(keys::cafes(user_id), move |ctx| async move {
            ctx.load_cafes(user_id).await
        }))
    }

    pub fn categories_query(&self, cafe_id: i64) -> Query<Vec<Category>> {
        self.bind(keys::categories(cafe_id), move |ctx| async move {
            ctx.load_categories(cafe_id).await
        })
    }

    pub fn products_query(&self, category_id: i64) -> Query<Vec<Product>> {
        self.bind(keys::products(category_id), move |ctx| async move {
            ctx.load_products(category_id).await
        })
    }

    // ── Writes ───────────────────────────────────────────────────────

    /// Run one write: persist, then (for cafes) drop the owner's listing
    /// cache entry, then invalidate the affected queries. A failed persist
    /// invalidates nothing.
    pub async fn execute(&self, cmd: Command) -> Result<CommandResult, CoreError> {
        debug!(?cmd, "executing command");
        match cmd {
            // ── Cafes ────────────────────────────────────────────
            Command::CreateCafe(req) => {
                let user_id = self.user_id()?;
                let body = req.into_body(user_id)?;
                let (cafe, cache) = self
                    .cafe_write(user_id, body, |repos, body| async move {
                        Ok::<_, CoreError>(Cafe::from(repos.cafes.create(&body).await?))
                    })
                    .await?;
                Ok(CommandResult::Cafe { cafe, cache })
            }
            Command::UpdateCafe { id, update } => {
                let user_id = self.user_id()?;
                let body = update.into_body(id)?;
                let (cafe, cache) = self
                    .cafe_write(user_id, body, |repos, body| async move {
                        Ok::<_, CoreError>(Cafe::from(repos.cafes.update(&body).await?))
                    })
                    .await?;
                Ok(CommandResult::Cafe { cafe, cache })
            }
            Command::DeleteCafe { id } => {
                let user_id = self.user_id()?;
                let ((), cache) = self
                    .cafe_write(user_id, id, |repos, id| async move {
                        repos.cafes.remove(id).await.map_err(CoreError::from)
                    })
                    .await?;
                Ok(CommandResult::CafeDeleted { id, cache })
            }
            Command::ReorderCafes { cafe_ids } => {
                let user_id = self.user_id()?;
                let (ids, cache) = self
                    .cafe_write(user_id, cafe_ids, move |repos, ids| async move {
                        ensure_applied(repos.cafes.reorder(user_id, &ids).await?)?;
                        Ok::<_, CoreError>(ids)
                    })
                    .await?;
                Ok(CommandResult::CafesReordered { ids, cache })
            }

            // ── Categories ───────────────────────────────────────
            Command::CreateCategory(req) => {
                let body = req.into_body()?;
                let scope = vec![keys::categories(body.cafe_id), keys::all_menus()];
                let category = self
                    .write(body, scope, |repos, body| async move {
                        Ok::<_, CoreError>(Category::from(repos.categories.create(&body).await?))
                    })
                    .await?;
                Ok(CommandResult::Category(category))
            }
            Command::UpdateCategory { id, update } => {
                let body = update.into_body(id)?;
                let category = self
                    .write(body, category_scope(), |repos, body| async move {
                        Ok::<_, CoreError>(Category::from(repos.categories.update(&body).await?))
                    })
                    .await?;
                Ok(CommandResult::Category(category))
            }
            Command::DeleteCategory { id } => {
                self.write(id, category_scope(), |repos, id| async move {
                    repos.categories.remove(id).await.map_err(CoreError::from)
                })
                .await?;
                Ok(CommandResult::Deleted { id })
            }
            Command::ReorderCategories {
                cafe_id,
                category_ids,
            } => {
                let scope = vec![
                    keys::categories(cafe_id),
                    CacheKey::new("category"),
                    keys::all_menus(),
                ];
                let ids = self
                    .write(category_ids, scope, move |repos, ids| async move {
                        ensure_applied(repos.categories.reorder(cafe_id, &ids).await?)?;
                        Ok::<_, CoreError>(ids)
                    })
                    .await?;
                Ok(CommandResult::Reordered { ids })
            }

            // ── Products ─────────────────────────────────────────
            Command::CreateProduct(req) => {
                let body = req.into_body()?;
                let scope = vec![keys::products(body.category_id), keys::all_menus()];
                let product = self
                    .write(body, scope, |repos, body| async move {
                        Ok::<_, CoreError>(Product::from(repos.products.create(&body).await?))
                    })
                    .await?;
                Ok(CommandResult::Product(product))
            }
            Command::UpdateProduct { id, update } => {
                let body = update.into_body(id)?;
                let product = self
                    .write(body, product_scope(), |repos, body| async move {
                        Ok::<_, CoreError>(Product::from(repos.products.update(&body).await?))
                    })
                    .await?;
                Ok(CommandResult::Product(product))
            }
            Command::DeleteProduct { id } => {
                self.write(id, product_scope(), |repos, id| async move {
                    repos.products.remove(id).await.map_err(CoreError::from)
                })
                .await?;
                Ok(CommandResult::Deleted { id })
            }
            Command::ReorderProducts {
                category_id,
                product_ids,
            } => {
                let scope = vec![
                    keys::products(category_id),
                    CacheKey::new("product"),
                    keys::all_menus(),
                ];
                let ids = self
                    .write(product_ids, scope, move |repos, ids| async move {
                        ensure_applied(repos.products.reorder(category_id, &ids).await?)?;
                        Ok::<_, CoreError>(ids)
                    })
                    .await?;
                Ok(CommandResult::Reordered { ids })
            }
        }
    }

    // ── Internals ────────────────────────────────────────────────────

    async fn read<T, F, Fut>(&self, key: CacheKey, load: F) -> Result<Arc<T>, CoreError>
    where
        T: Send + Sync + 'static,
        F: Fn(AppContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, CoreError>> + Send + 'static,
    {
        let ctx = self.clone();
        self.inner
            .queries
            .fetch_query(&key, move || load(ctx.clone()))
            .await
    }

    fn bind<T, F, Fut>(&self, key: CacheKey, load: F) -> Query<T>
    where
        T: Send + Sync + 'static,
        F: Fn(AppContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, CoreError>> + Send + 'static,
    {
        let ctx = self.clone();
        self.inner.queries.query(key, move || load(ctx.clone()))
    }

    async fn write<I, O, F, Fut>(
        &self,
        input: I,
        invalidates: Vec<CacheKey>,
        op: F,
    ) -> Result<O, CoreError>
    where
        I: Send + 'static,
        O: Send + 'static,
        F: Fn(Repositories, I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O, CoreError>> + Send + 'static,
    {
        let repos = self.inner.repos.clone();
        let mut mutation = Mutation::new(self.inner.queries.clone(), move |input| {
            op(repos.clone(), input)
        });
        for prefix in invalidates {
            mutation = mutation.invalidates(prefix);
        }
        mutation.execute(input).await
    }

    /// `write` plus best-effort invalidation of the owner's listing cache,
    /// placed between the persist and the query invalidation.
    async fn cafe_write<I, O, F, Fut>(
        &self,
        user_id: i64,
        input: I,
        op: F,
    ) -> Result<(O, InvalidationOutcome), CoreError>
    where
        I: Send + 'static,
        O: Send + 'static,
        F: Fn(Repositories, I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O, CoreError>> + Send + 'static,
    {
        let invalidator = self.inner.invalidator.clone();
        let scope = vec![
            keys::cafes(user_id),
            CacheKey::new("cafe"),
            keys::all_menus(),
        ];
        self.write(input, scope, move |repos, input| {
            let persist = op(repos, input);
            let invalidator = invalidator.clone();
            async move {
                let output = persist.await?;
                let cache = invalidator.invalidate(user_id).await;
                Ok::<_, CoreError>((output, cache))
            }
        })
        .await
    }

    /// Cafe listing, served from the shared listing cache when it holds an
    /// entry. Reads never write that cache; only cafe writes touch it.
    async fn load_cafes(&self, user_id: i64) -> Result<Vec<Cafe>, CoreError> {
        let key = cafes_listing_key(user_id);

        if let Some(ref cache) = self.inner.listing_cache {
            match cache.get(&key).await {
                Ok(Some(raw)) => match serde_json::from_str::<Vec<Cafe>>(&raw) {
                    Ok(cafes) => {
                        debug!(%key, "cafe listing served from listing cache");
                        return Ok(cafes);
                    }
                    Err(e) => warn!(%key, error = %e, "ignoring undecodable listing cache entry"),
                },
                Ok(None) => {}
                Err(e) => warn!(%key, error = %e, "listing cache read failed"),
            }
        }

        let cafes = self
            .inner
            .repos
            .cafes
            .list_by_user(user_id)
            .await?
            .into_iter()
            .map(Cafe::from)
            .collect();
        Ok(cafes)
    }

    async fn load_categories(&self, cafe_id: i64) -> Result<Vec<Category>, CoreError> {
        let rows = self.inner.repos.categories.list_by_cafe(cafe_id).await?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn load_products(&self, category_id: i64) -> Result<Vec<Product>, CoreError> {
        let rows = self.inner.repos.products.list_by_category(category_id).await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }
}

fn category_scope() -> Vec<CacheKey> {
    vec![
        CacheKey::new("categories"),
        CacheKey::new("category"),
        keys::all_menus(),
    ]
}

fn product_scope() -> Vec<CacheKey> {
    vec![
        CacheKey::new("products"),
        CacheKey::new("product"),
        keys::all_menus(),
    ]
}

fn ensure_applied(applied: bool) -> Result<(), CoreError> {
    if applied {
        Ok(())
    } else {
        Err(CoreError::Http {
            status: 200,
            message: "backend did not apply the new order".into(),
            details: None,
        })
    }
}

/// Await every handle, logging the ones that panicked or were aborted.
/// Returns how many ended abnormally.
async fn join_tasks(handles: Vec<JoinHandle<()>>) -> usize {
    let mut failed = 0;
    for handle in handles {
        if let Err(e) = handle.await {
            warn!(error = %e, "background task ended abnormally");
            failed += 1;
        }
    }
    failed
}

/// Periodically evict unobserved query entries until cancelled.
async fn gc_task(queries: QueryClient, every: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(every);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                queries.collect_garbage();
            }
        }
    }
}
