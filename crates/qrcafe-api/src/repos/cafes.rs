// Cafe endpoints
//
// Cafes are scoped to their owning user: the listing is `GET cafes/user/{id}`
// and the reorder payload is `{ user_id, cafe_ids }`.

use serde_json::Value;
use tracing::debug;
use url::Url;

use super::{reorder_succeeded, validate_order};
use crate::error::Error;
use crate::models::{CafeCreate, CafeResponse, CafeUpdate};
use crate::resource::ResourceClient;
use crate::sort::{SortConfig, SortService, Sortable, sort_siblings};

#[derive(Debug, Clone)]
pub struct CafeRepository {
    resource: ResourceClient,
    sorter: SortService,
}

impl CafeRepository {
    pub fn new(http: reqwest::Client, base_url: &Url) -> Self {
        Self {
            resource: ResourceClient::new(http.clone(), base_url, "cafes"),
            sorter: SortService::new(http, base_url),
        }
    }

    /// `POST cafes/create`
    pub async fn create(&self, body: &CafeCreate) -> Result<CafeResponse, Error> {
        debug!(name = %body.name, "creating cafe");
        self.resource.post("create", body).await
    }

    /// `PUT cafes/update`
    pub async fn update(&self, body: &CafeUpdate) -> Result<CafeResponse, Error> {
        debug!(id = body.id, "updating cafe");
        self.resource.put("update", body).await
    }

    /// `GET cafes/{id}`
    pub async fn get(&self, id: i64) -> Result<CafeResponse, Error> {
        self.resource.get(&id.to_string()).await
    }

    /// `GET cafes/user/{user_id}`, in display order.
    pub async fn list_by_user(&self, user_id: i64) -> Result<Vec<CafeResponse>, Error> {
        let mut cafes: Vec<CafeResponse> =
            self.resource.get(&format!("user/{user_id}")).await?;
        sort_siblings(&mut cafes);
        Ok(cafes)
    }

    /// `DELETE cafes/{id}`
    pub async fn remove(&self, id: i64) -> Result<(), Error> {
        debug!(id, "deleting cafe");
        let _: Value = self.resource.delete(&id.to_string()).await?;
        Ok(())
    }

    /// Sort configuration for a user's cafes.
    pub fn sort_config<T>(&self, user_id: i64) -> SortConfig<T> {
        SortConfig::new(format!("{}/sort-order", self.resource.prefix()))
            .param("user_id", user_id)
            .ids_key("cafe_ids")
    }

    /// `PUT cafes/sort-order` with the full ordered list.
    pub async fn reorder<T: Sortable>(&self, user_id: i64, items: &[T]) -> Result<bool, Error> {
        let config = self.sort_config(user_id);
        validate_order("cafe_ids", &config.ids(items))?;
        let value = self.sorter.update_sort_order(items, &config).await?;
        reorder_succeeded(&value)
    }
}
