// Category endpoints
//
// Categories are siblings within a cafe: the listing is
// `GET categories/cafe/{id}` and the reorder payload is
// `{ cafe_id, category_ids }`.

use serde_json::Value;
use tracing::debug;
use url::Url;

use super::{reorder_succeeded, validate_order};
use crate::error::Error;
use crate::models::{CategoryCreate, CategoryResponse, CategoryUpdate};
use crate::resource::ResourceClient;
use crate::sort::{SortConfig, SortService, Sortable, sort_siblings};

#[derive(Debug, Clone)]
pub struct CategoryRepository {
    resource: ResourceClient,
    sorter: SortService,
}

impl CategoryRepository {
    pub fn new(http: reqwest::Client, base_url: &Url) -> Self {
        Self {
            resource: ResourceClient::new(http.clone(), base_url, "categories"),
            sorter: SortService::new(http, base_url),
        }
    }

    /// `POST categories/create`
    pub async fn create(&self, body: &CategoryCreate) -> Result<CategoryResponse, Error> {
        debug!(cafe_id = body.cafe_id, name = %body.name, "creating category");
        self.resource.post("create", body).await
    }

    /// `PUT categories/update`
    pub async fn update(&self, body: &CategoryUpdate) -> Result<CategoryResponse, Error> {
        debug!(id = body.id, "updating category");
        self.resource.put("update", body).await
    }

    /// `GET categories/{id}`
    pub async fn get(&self, id: i64) -> Result<CategoryResponse, Error> {
        self.resource.get(&id.to_string()).await
    }

    /// `GET categories/cafe/{cafe_id}`, in display order.
    pub async fn list_by_cafe(&self, cafe_id: i64) -> Result<Vec<CategoryResponse>, Error> {
        let mut categories: Vec<CategoryResponse> =
            self.resource.get(&format!("cafe/{cafe_id}")).await?;
        sort_siblings(&mut categories);
        Ok(categories)
    }

    /// `DELETE categories/{id}`
    pub async fn remove(&self, id: i64) -> Result<(), Error> {
        debug!(id, "deleting category");
        let _: Value = self.resource.delete(&id.to_string()).await?;
        Ok(())
    }

    pub fn sort_config<T>(&self, cafe_id: i64) -> SortConfig<T> {
        SortConfig::new(format!("{}/sort-order", self.resource.prefix()))
            .param("cafe_id", cafe_id)
            .ids_key("category_ids")
    }

    /// `PUT categories/sort-order` with every category of the cafe, in order.
    pub async fn reorder<T: Sortable>(&self, cafe_id: i64, items: &[T]) -> Result<bool, Error> {
        let config = self.sort_config(cafe_id);
        validate_order("category_ids", &config.ids(items))?;
        let value = self.sorter.update_sort_order(items, &config).await?;
        reorder_succeeded(&value)
    }
}
