// Product endpoints
//
// Products are siblings within a category: the listing is
// `GET products/category/{id}` and the reorder payload is
// `{ category_id, product_ids }`.

use serde_json::Value;
use tracing::debug;
use url::Url;

use super::{reorder_succeeded, validate_order};
use crate::error::Error;
use crate::models::{ProductCreate, ProductResponse, ProductUpdate};
use crate::resource::ResourceClient;
use crate::sort::{SortConfig, SortService, Sortable, sort_siblings};

#[derive(Debug, Clone)]
pub struct ProductRepository {
    resource: ResourceClient,
    sorter: SortService,
}

impl ProductRepository {
    pub fn new(http: reqwest::Client, base_url: &Url) -> Self {
        Self {
            resource: ResourceClient::new(http.clone(), base_url, "products"),
            sorter: SortService::new(http, base_url),
        }
    }

    /// `POST products/create`
    pub async fn create(&self, body: &ProductCreate) -> Result<ProductResponse, Error> {
        debug!(category_id = body.category_id, name = %body.name, "creating product");
        self.resource.post("create", body).await
    }

    /// `PUT products/update`
    pub async fn update(&self, body: &ProductUpdate) -> Result<ProductResponse, Error> {
        debug!(id = body.id, "updating product");
        self.resource.put("update", body).await
    }

    /// `GET products/{id}`
    pub async fn get(&self, id: i64) -> Result<ProductResponse, Error> {
        self.resource.get(&id.to_string()).await
    }

    /// `GET products/category/{category_id}`, in display order.
    pub async fn list_by_category(&self, category_id: i64) -> Result<Vec<ProductResponse>, Error> {
        let mut products: Vec<ProductResponse> = self
            .resource
            .get(&format!("category/{category_id}"))
            .await?;
        sort_siblings(&mut products);
        Ok(products)
    }

    /// `DELETE products/{id}`
    pub async fn remove(&self, id: i64) -> Result<(), Error> {
        debug!(id, "deleting product");
        let _: Value = self.resource.delete(&id.to_string()).await?;
        Ok(())
    }

    pub fn sort_config<T>(&self, category_id: i64) -> SortConfig<T> {
        SortConfig::new(format!("{}/sort-order", self.resource.prefix()))
            .param("category_id", category_id)
            .ids_key("product_ids")
    }

    /// `PUT products/sort-order` with every product of the category, in order.
    pub async fn reorder<T: Sortable>(
        &self,
        category_id: i64,
        items: &[T],
    ) -> Result<bool, Error> {
        let config = self.sort_config(category_id);
        validate_order("product_ids", &config.ids(items))?;
        let value = self.sorter.update_sort_order(items, &config).await?;
        reorder_succeeded(&value)
    }
}
