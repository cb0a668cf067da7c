// ── Query layer ──
//
// Keyed, coalescing, staleness-aware cache of backend reads, plus the
// mutation binding that invalidates it. Consumers bind a `Query` per view
// and drive writes through `Mutation`.

mod client;
mod key;
mod mutation;
mod options;
#[allow(clippy::module_inception)]
mod query;
mod state;

pub use client::QueryClient;
pub use key::{CacheKey, KeySegment};
pub use mutation::Mutation;
pub use options::{DEFAULT_GC_TIME, DEFAULT_STALE_TIME, QueryOptions};
pub use query::Query;
pub use state::RequestState;
