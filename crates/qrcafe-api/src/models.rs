// Wire types for the qrcafe backend.
//
// Every endpoint answers with the `ApiResponse<T>` envelope. Row types use
// `#[serde(default)]` for optional columns so older rows without them still
// decode.

use serde::{Deserialize, Serialize};

use crate::sort::{Ordered, Sortable};

// ── Response Envelope ────────────────────────────────────────────────

/// Standard response envelope.
///
/// ```json
/// { "success": true, "data": { ... } }
/// { "success": false, "error": "Invalid id", "details": { ... } }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiResponse<T> {
    #[serde(default = "default_true")]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}

fn default_true() -> bool {
    true
}

// ── Cafe ─────────────────────────────────────────────────────────────

/// Cafe row as returned by `cafes/*`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CafeResponse {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Body for `POST cafes/create`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CafeCreate {
    pub owner_id: i64,
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

/// Body for `PUT cafes/update`. Never carries `sort_order`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CafeUpdate {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

// ── Category ─────────────────────────────────────────────────────────

/// Category row as returned by `categories/*`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub id: i64,
    pub cafe_id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
}

/// Body for `POST categories/create`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCreate {
    pub cafe_id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Body for `PUT categories/update`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryUpdate {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// ── Product ──────────────────────────────────────────────────────────

/// Product row as returned by `products/*`. `price` is a decimal amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductResponse {
    pub id: i64,
    pub category_id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_available: bool,
    #[serde(default)]
    pub sort_order: i32,
}

/// Body for `POST products/create`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub category_id: i64,
    pub name: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
}

/// Body for `PUT products/update`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
}

// ── Public menu ──────────────────────────────────────────────────────

/// Public menu payload from `GET menu/{slug}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuResponse {
    pub cafe: CafeResponse,
    #[serde(default)]
    pub categories: Vec<MenuSectionResponse>,
}

/// A category with its products, as nested in `MenuResponse`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuSectionResponse {
    #[serde(flatten)]
    pub category: CategoryResponse,
    #[serde(default)]
    pub products: Vec<ProductResponse>,
}

// ── Ordering impls ───────────────────────────────────────────────────

impl Sortable for CafeResponse {
    fn sort_id(&self) -> Option<i64> {
        Some(self.id)
    }
}

impl Ordered for CafeResponse {
    fn display_key(&self) -> (i32, i64) {
        (self.sort_order, self.id)
    }
}

impl Sortable for CategoryResponse {
    fn sort_id(&self) -> Option<i64> {
        Some(self.id)
    }
}

impl Ordered for CategoryResponse {
    fn display_key(&self) -> (i32, i64) {
        (self.sort_order, self.id)
    }
}

impl Sortable for ProductResponse {
    fn sort_id(&self) -> Option<i64> {
        Some(self.id)
    }
}

impl Ordered for ProductResponse {
    fn display_key(&self) -> (i32, i64) {
        (self.sort_order, self.id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_defaults_to_success() {
        let env: ApiResponse<i64> = serde_json::from_value(json!({ "data": 3 })).unwrap();
        assert!(env.success);
        assert_eq!(env.data, Some(3));
    }

    #[test]
    fn envelope_failure_keeps_details() {
        let env: ApiResponse<i64> = serde_json::from_value(json!({
            "success": false,
            "error": "Invalid cafe id",
            "details": { "field": "cafe_id" }
        }))
        .unwrap();
        assert!(!env.success);
        assert!(env.data.is_none());
        assert_eq!(env.error.as_deref(), Some("Invalid cafe id"));
        assert_eq!(env.details.unwrap()["field"], "cafe_id");
    }

    #[test]
    fn update_body_never_carries_sort_order() {
        let body = serde_json::to_value(CategoryUpdate {
            id: 4,
            name: Some("Drinks".into()),
            description: None,
        })
        .unwrap();
        assert_eq!(body, json!({ "id": 4, "name": "Drinks" }));
    }

    #[test]
    fn menu_section_flattens_category_fields() {
        let section: MenuSectionResponse = serde_json::from_value(json!({
            "id": 1,
            "cafe_id": 7,
            "name": "Coffee",
            "sort_order": 0,
            "products": [{ "id": 9, "category_id": 1, "name": "Latte", "price": 3.5 }]
        }))
        .unwrap();
        assert_eq!(section.category.name, "Coffee");
        assert_eq!(section.products.len(), 1);
        assert!(section.products[0].is_available);
    }
}
