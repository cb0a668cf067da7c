// Redis-backed listing cache.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use tracing::{debug, info};

use super::ListingCache;
use crate::error::CoreError;

/// Listing cache over a shared Redis connection.
///
/// `ConnectionManager` reconnects on its own and is cheap to clone, so each
/// call works on a clone instead of locking one connection.
#[derive(Clone)]
pub struct RedisListingCache {
    conn: ConnectionManager,
}

impl fmt::Debug for RedisListingCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisListingCache").finish_non_exhaustive()
    }
}

impl RedisListingCache {
    /// Open a managed connection to `url` (e.g. `redis://127.0.0.1:6379/0`).
    pub async fn connect(url: &str) -> Result<Self, CoreError> {
        let client = redis::Client::open(url).map_err(|e| CoreError::Configuration {
            message: format!("invalid cache URL: {e}"),
        })?;
        let conn = ConnectionManager::new(client).await?;
        info!("connected to listing cache");
        Ok(Self { conn })
    }
}

#[async_trait]
impl ListingCache for RedisListingCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await?;
        debug!(key, hit = value.is_some(), "listing cache get");
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CoreError> {
        let mut conn = self.conn.clone();
        match ttl {
            Some(ttl) => conn.set_ex::<_, _, ()>(key, value, ttl.as_secs().max(1)).await?,
            None => conn.set::<_, _, ()>(key, value).await?,
        }
        debug!(key, "listing cache set");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CoreError> {
        let mut conn = self.conn.clone();
        let removed: i64 = conn.del(key).await?;
        debug!(key, removed, "listing cache delete");
        Ok(())
    }
}
