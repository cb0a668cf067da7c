// ── External listing cache ──
//
// The backend fronts the per-user cafe listing with a shared key/value
// cache. Writes to cafes must drop the owner's entry so the next listing
// is rebuilt. Dropping it is best-effort: a cache outage never fails a
// write that already persisted.

mod invalidator;
mod memory;
mod redis_cache;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::CoreError;

pub use self::invalidator::{CacheInvalidator, InvalidationOutcome};
pub use self::memory::MemoryListingCache;
pub use self::redis_cache::RedisListingCache;

/// Key of a user's cached cafe listing.
pub fn cafes_listing_key(user_id: i64) -> String {
    format!("cafes:user:{user_id}")
}

/// Minimal key/value surface of the listing cache.
#[async_trait]
pub trait ListingCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CoreError>;

    /// Store `value`, expiring after `ttl` when given.
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CoreError>;

    /// Remove `key`. Removing a missing key succeeds.
    async fn delete(&self, key: &str) -> Result<(), CoreError>;
}
