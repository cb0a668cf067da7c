use qrcafe_api::{Ordered, Sortable};
use serde::{Deserialize, Serialize};

use super::Price;

/// A menu item. Siblings are the other products of the same category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub category_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: Price,
    pub image_url: Option<String>,
    pub is_available: bool,
    pub sort_order: i32,
}

impl Sortable for Product {
    fn sort_id(&self) -> Option<i64> {
        Some(self.id)
    }
}

impl Ordered for Product {
    fn display_key(&self) -> (i32, i64) {
        (self.sort_order, self.id)
    }
}
