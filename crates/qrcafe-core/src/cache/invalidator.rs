// Best-effort invalidation of a user's cafe listing.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use super::{ListingCache, cafes_listing_key};

/// What happened to the listing cache after a cafe write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidationOutcome {
    /// The user's entry was deleted (or was already absent).
    Invalidated,
    /// No listing cache is configured.
    Skipped,
    /// The cache could not be reached; the write itself still stands.
    Failed { warning: String },
}

impl InvalidationOutcome {
    pub fn warning(&self) -> Option<&str> {
        match self {
            Self::Failed { warning } => Some(warning),
            Self::Invalidated | Self::Skipped => None,
        }
    }
}

/// Deletes `cafes:user:<id>` after successful cafe writes.
#[derive(Clone, Default)]
pub struct CacheInvalidator {
    cache: Option<Arc<dyn ListingCache>>,
}

impl fmt::Debug for CacheInvalidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheInvalidator")
            .field("enabled", &self.cache.is_some())
            .finish()
    }
}

impl CacheInvalidator {
    pub fn new(cache: Option<Arc<dyn ListingCache>>) -> Self {
        Self { cache }
    }

    pub fn is_enabled(&self) -> bool {
        self.cache.is_some()
    }

    /// Drop the cached cafe listing of `user_id`. Never fails: a cache error
    /// is logged and handed back as a warning.
    pub async fn invalidate(&self, user_id: i64) -> InvalidationOutcome {
        let Some(ref cache) = self.cache else {
            return InvalidationOutcome::Skipped;
        };

        let key = cafes_listing_key(user_id);
        match cache.delete(&key).await {
            Ok(()) => {
                debug!(%key, "invalidated cafe listing cache");
                InvalidationOutcome::Invalidated
            }
            Err(e) => {
                warn!(%key, error = %e, "failed to invalidate cafe listing cache");
                InvalidationOutcome::Failed {
                    warning: format!("cafe listing cache not invalidated: {e}"),
                }
            }
        }
    }
}
