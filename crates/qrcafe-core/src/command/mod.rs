// ── Command API ──
//
// Every write goes through one `Command` enum. `AppContext::execute` routes
// each variant to its repository, then runs the listing-cache and query
// invalidation that variant requires.

pub mod requests;

use crate::cache::InvalidationOutcome;
use crate::model::{Cafe, Category, Product};

pub use requests::{
    CreateCafeRequest, CreateCategoryRequest, CreateProductRequest, UpdateCafeRequest,
    UpdateCategoryRequest, UpdateProductRequest,
};

/// All write operations against the menu backend.
#[derive(Debug, Clone)]
pub enum Command {
    // ── Cafes ────────────────────────────────────────────────────────
    CreateCafe(CreateCafeRequest),
    UpdateCafe {
        id: i64,
        update: UpdateCafeRequest,
    },
    DeleteCafe {
        id: i64,
    },
    /// Every cafe of the acting user, in the new order.
    ReorderCafes {
        cafe_ids: Vec<i64>,
    },

    // ── Categories ───────────────────────────────────────────────────
    CreateCategory(CreateCategoryRequest),
    UpdateCategory {
        id: i64,
        update: UpdateCategoryRequest,
    },
    DeleteCategory {
        id: i64,
    },
    ReorderCategories {
        cafe_id: i64,
        category_ids: Vec<i64>,
    },

    // ── Products ─────────────────────────────────────────────────────
    CreateProduct(CreateProductRequest),
    UpdateProduct {
        id: i64,
        update: UpdateProductRequest,
    },
    DeleteProduct {
        id: i64,
    },
    ReorderProducts {
        category_id: i64,
        product_ids: Vec<i64>,
    },
}

impl Command {
    /// Whether this command touches the owner's cafe listing.
    pub fn affects_cafe_listing(&self) -> bool {
        matches!(
            self,
            Self::CreateCafe(_)
                | Self::UpdateCafe { .. }
                | Self::DeleteCafe { .. }
                | Self::ReorderCafes { .. }
        )
    }
}

/// Result of a successfully executed command.
///
/// Cafe variants carry the listing cache outcome so callers can surface a
/// warning when the cache could not be reached.
#[derive(Debug, Clone)]
pub enum CommandResult {
    Cafe {
        cafe: Cafe,
        cache: InvalidationOutcome,
    },
    CafeDeleted {
        id: i64,
        cache: InvalidationOutcome,
    },
    CafesReordered {
        ids: Vec<i64>,
        cache: InvalidationOutcome,
    },
    Category(Category),
    Product(Product),
    Deleted {
        id: i64,
    },
    Reordered {
        ids: Vec<i64>,
    },
}

impl CommandResult {
    /// Warning from a best-effort listing cache invalidation, if any.
    pub fn cache_warning(&self) -> Option<&str> {
        match self {
            Self::Cafe { cache, .. }
            | Self::CafeDeleted { cache, .. }
            | Self::CafesReordered { cache, .. } => cache.warning(),
            Self::Category(_) | Self::Product(_) | Self::Deleted { .. } | Self::Reordered { .. } => {
                None
            }
        }
    }
}
