// qrcafe-api: Async Rust client for the qrcafe menu backend.
//
// Every resource shares one verb factory (`ResourceClient`) bound to a path
// prefix; the typed repositories compose it rather than inherit from it.

pub mod error;
pub mod ids;
pub mod models;
pub mod repos;
pub mod resource;
pub mod sort;
pub mod transport;

pub use error::Error;
pub use ids::parse_numeric_id;
pub use models::{
    ApiResponse, CafeCreate, CafeResponse, CafeUpdate, CategoryCreate, CategoryResponse,
    CategoryUpdate, MenuResponse, MenuSectionResponse, ProductCreate, ProductResponse,
    ProductUpdate,
};
pub use repos::{CafeRepository, CategoryRepository, MenuRepository, ProductRepository};
pub use resource::ResourceClient;
pub use sort::{Ordered, SortConfig, SortService, Sortable, sort_siblings};
pub use transport::TransportConfig;
