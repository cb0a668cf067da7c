use serde::{Deserialize, Serialize};

use super::{Cafe, Category, Product};

/// What a guest sees after scanning the QR code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicMenu {
    pub cafe: Cafe,
    pub sections: Vec<MenuSection>,
}

/// One category with its available products, both in display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuSection {
    pub category: Category,
    pub products: Vec<Product>,
}

impl PublicMenu {
    /// Total number of products across all sections.
    pub fn product_count(&self) -> usize {
        self.sections.iter().map(|s| s.products.len()).sum()
    }
}
