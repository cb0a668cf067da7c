// ── Domain model ──
//
// Canonical menu entities handed to consumers. Wire rows from qrcafe-api are
// converted in `crate::convert`; nothing here touches the network.

pub mod cafe;
pub mod category;
pub mod menu;
pub mod price;
pub mod product;

pub use cafe::{Cafe, DEFAULT_CURRENCY};
pub use category::Category;
pub use menu::{MenuSection, PublicMenu};
pub use price::Price;
pub use product::Product;
