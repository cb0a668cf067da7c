use qrcafe_api::{Ordered, Sortable};
use serde::{Deserialize, Serialize};

/// A menu section. Siblings are the other categories of the same cafe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub cafe_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub sort_order: i32,
}

impl Sortable for Category {
    fn sort_id(&self) -> Option<i64> {
        Some(self.id)
    }
}

impl Ordered for Category {
    fn display_key(&self) -> (i32, i64) {
        (self.sort_order, self.id)
    }
}
