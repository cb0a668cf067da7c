// qrcafe-core: domain layer between qrcafe-api and consumers (CLI).

pub mod cache;
pub mod command;
pub mod config;
pub mod context;
pub mod convert;
pub mod error;
pub mod format;
pub mod keys;
pub mod model;
pub mod ordering;
pub mod query;

// ── Primary re-exports ──────────────────────────────────────────────
pub use cache::{CacheInvalidator, InvalidationOutcome, ListingCache, MemoryListingCache, RedisListingCache};
pub use command::requests::*;
pub use command::{Command, CommandResult};
pub use config::CoreConfig;
pub use context::AppContext;
pub use convert::parse_id;
pub use error::CoreError;
pub use format::{format_price, slugify};
pub use ordering::{move_item, sort_siblings};
pub use query::{CacheKey, KeySegment, Mutation, Query, QueryClient, QueryOptions, RequestState};

pub use model::{Cafe, Category, MenuSection, Price, Product, PublicMenu};
