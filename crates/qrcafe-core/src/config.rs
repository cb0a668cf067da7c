// ── Runtime configuration ──
//
// Describes which backend to talk to and how the query cache behaves. The
// CLI builds a `CoreConfig` from its profile and hands it in; core never
// reads config files.

use std::time::Duration;

use qrcafe_api::TransportConfig;
use secrecy::SecretString;
use url::Url;

use crate::query::QueryOptions;

/// How often the background task sweeps unobserved query entries.
pub const DEFAULT_GC_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// API root, e.g. `https://api.qrcafe.app/api`.
    pub api_url: Url,
    /// Acting user. Required for cafe listings and cafe writes.
    pub user_id: Option<i64>,
    /// Bearer token sent with every request.
    pub api_token: Option<SecretString>,
    /// Redis URL of the shared cafe listing cache. `None` disables it.
    pub cache_url: Option<String>,
    /// Request timeout. `None` keeps the HTTP client default.
    pub timeout: Option<Duration>,
    /// Default freshness and retention for queries.
    pub query: QueryOptions,
    /// Sweep interval for unobserved query entries. Zero disables the task.
    pub gc_interval: Duration,
}

impl CoreConfig {
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            user_id: None,
            api_token: None,
            cache_url: None,
            timeout: None,
            query: QueryOptions::default(),
            gc_interval: DEFAULT_GC_INTERVAL,
        }
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig {
            timeout: self.timeout,
            api_token: self.api_token.clone(),
            cookie_jar: None,
        }
        .with_cookie_jar()
    }
}
