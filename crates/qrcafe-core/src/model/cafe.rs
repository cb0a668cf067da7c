use chrono::{DateTime, Utc};
use qrcafe_api::{Ordered, Sortable};
use serde::{Deserialize, Serialize};

/// Currency assumed when a cafe row carries none.
pub const DEFAULT_CURRENCY: &str = "USD";

/// A cafe owned by one user. Siblings are the owner's other cafes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cafe {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub currency: String,
    pub sort_order: i32,
    pub created_at: Option<DateTime<Utc>>,
}

impl Sortable for Cafe {
    fn sort_id(&self) -> Option<i64> {
        Some(self.id)
    }
}

impl Ordered for Cafe {
    fn display_key(&self) -> (i32, i64) {
        (self.sort_order, self.id)
    }
}
