// ── Query keys ──
//
// One place for the cache keys used by reads and the prefixes invalidated by
// writes. Key shape: `[resource, scope..]`.

use crate::query::CacheKey;

pub fn cafes(user_id: i64) -> CacheKey {
    CacheKey::new("cafes").with("user").with(user_id)
}

pub fn cafe(id: i64) -> CacheKey {
    CacheKey::new("cafe").with(id)
}

pub fn categories(cafe_id: i64) -> CacheKey {
    CacheKey::new("categories").with("cafe").with(cafe_id)
}

pub fn category(id: i64) -> CacheKey {
    CacheKey::new("category").with(id)
}

pub fn products(category_id: i64) -> CacheKey {
    CacheKey::new("products").with("category").with(category_id)
}

pub fn product(id: i64) -> CacheKey {
    CacheKey::new("product").with(id)
}

pub fn menu(slug: &str) -> CacheKey {
    CacheKey::new("menu").with(slug)
}

/// Every public menu, whatever the slug.
pub fn all_menus() -> CacheKey {
    CacheKey::new("menu")
}
