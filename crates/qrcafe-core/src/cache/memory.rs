// In-process listing cache, for single-node setups and tests.

use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::time::Instant;

use super::ListingCache;
use crate::error::CoreError;

#[derive(Debug, Default)]
pub struct MemoryListingCache {
    entries: DashMap<String, (String, Option<Instant>)>,
}

impl MemoryListingCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .get(key)
            .is_some_and(|e| e.1.is_none_or(|deadline| Instant::now() < deadline))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl ListingCache for MemoryListingCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        let Some(entry) = self.entries.get(key) else {
            return Ok(None);
        };
        let (value, deadline) = entry.value();
        if deadline.is_some_and(|d| Instant::now() >= d) {
            drop(entry);
            self.entries.remove(key);
            return Ok(None);
        }
        Ok(Some(value.clone()))
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CoreError> {
        let deadline = ttl.map(|ttl| Instant::now() + ttl);
        self.entries
            .insert(key.to_owned(), (value.to_owned(), deadline));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn set_get_expire() {
        let cache = MemoryListingCache::new();
        cache
            .set("cafes:user:1", "[]", Some(Duration::from_secs(30)))
            .await
            .unwrap();
        assert_eq!(cache.get("cafes:user:1").await.unwrap().as_deref(), Some("[]"));

        tokio::time::advance(Duration::from_secs(31)).await;
        assert!(cache.get("cafes:user:1").await.unwrap().is_none());
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn deleting_missing_key_succeeds() {
        let cache = MemoryListingCache::new();
        tokio_test::assert_ok!(cache.delete("cafes:user:404").await);
        cache.set("cafes:user:2", "[]", None).await.unwrap();
        tokio_test::assert_ok!(cache.delete("cafes:user:2").await);
        assert!(!cache.contains("cafes:user:2"));
    }
}
