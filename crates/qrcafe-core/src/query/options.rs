use std::time::Duration;

/// Data younger than this is served without a network call.
pub const DEFAULT_STALE_TIME: Duration = Duration::from_secs(5 * 60);

/// Unobserved entries older than this are evicted by garbage collection.
pub const DEFAULT_GC_TIME: Duration = Duration::from_secs(10 * 60);

/// Freshness and retention for a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    pub stale_time: Duration,
    pub gc_time: Duration,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            stale_time: DEFAULT_STALE_TIME,
            gc_time: DEFAULT_GC_TIME,
        }
    }
}

impl QueryOptions {
    pub fn stale_time(mut self, stale_time: Duration) -> Self {
        self.stale_time = stale_time;
        self
    }

    pub fn gc_time(mut self, gc_time: Duration) -> Self {
        self.gc_time = gc_time;
        self
    }
}
