// Public menu endpoint
//
// Read-only: the menu renderer fetches a whole cafe by slug in one call.

use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::MenuResponse;
use crate::resource::ResourceClient;
use crate::sort::sort_siblings;

#[derive(Debug, Clone)]
pub struct MenuRepository {
    resource: ResourceClient,
}

impl MenuRepository {
    pub fn new(http: reqwest::Client, base_url: &Url) -> Self {
        Self {
            resource: ResourceClient::new(http, base_url, "menu"),
        }
    }

    /// `GET menu/{slug}` with sections and products in display order.
    pub async fn by_slug(&self, slug: &str) -> Result<MenuResponse, Error> {
        let slug = slug.trim();
        if slug.is_empty() {
            return Err(Error::Validation {
                field: "slug".into(),
                message: "slug must not be empty".into(),
            });
        }

        debug!(slug, "fetching public menu");
        let mut menu: MenuResponse = self.resource.get(slug).await?;
        menu.categories
            .sort_by_key(|section| (section.category.sort_order, section.category.id));
        for section in &mut menu.categories {
            sort_siblings(&mut section.products);
        }
        Ok(menu)
    }
}
