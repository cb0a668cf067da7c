// ── Wire-to-domain conversion ──
//
// Maps qrcafe-api rows onto the canonical model. Listing order is already
// applied by the repositories and is preserved here.

use qrcafe_api::{CafeResponse, CategoryResponse, MenuResponse, MenuSectionResponse, ProductResponse};

use crate::error::CoreError;
use crate::model::{Cafe, Category, DEFAULT_CURRENCY, MenuSection, Price, Product, PublicMenu};

/// Parse a user-supplied id (path segment or CLI argument).
pub fn parse_id(raw: &str) -> Result<i64, CoreError> {
    Ok(qrcafe_api::parse_numeric_id(raw)?)
}

impl From<CafeResponse> for Cafe {
    fn from(row: CafeResponse) -> Self {
        Self {
            id: row.id,
            owner_id: row.owner_id,
            name: row.name,
            slug: row.slug,
            description: row.description,
            logo_url: row.logo_url,
            currency: row
                .currency
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_owned()),
            sort_order: row.sort_order,
            created_at: row.created_at,
        }
    }
}

impl From<CategoryResponse> for Category {
    fn from(row: CategoryResponse) -> Self {
        Self {
            id: row.id,
            cafe_id: row.cafe_id,
            name: row.name,
            description: row.description,
            sort_order: row.sort_order,
        }
    }
}

impl From<ProductResponse> for Product {
    fn from(row: ProductResponse) -> Self {
        Self {
            id: row.id,
            category_id: row.category_id,
            name: row.name,
            description: row.description,
            price: Price::from_decimal(row.price),
            image_url: row.image_url,
            is_available: row.is_available,
            sort_order: row.sort_order,
        }
    }
}

impl From<MenuSectionResponse> for MenuSection {
    fn from(section: MenuSectionResponse) -> Self {
        Self {
            category: section.category.into(),
            products: section
                .products
                .into_iter()
                .filter(|p| p.is_available)
                .map(Product::from)
                .collect(),
        }
    }
}

impl From<MenuResponse> for PublicMenu {
    fn from(menu: MenuResponse) -> Self {
        Self {
            cafe: menu.cafe.into(),
            sections: menu.categories.into_iter().map(MenuSection::from).collect(),
        }
    }
}
