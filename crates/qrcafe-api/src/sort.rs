// Sort-order persistence
//
// Turns a reordered item list into one HTTP call against a configurable
// endpoint. Owns no optimistic state and never retries: when the call fails
// the caller re-fetches the authoritative order.

use std::fmt;
use std::sync::Arc;

use reqwest::Method;
use serde_json::{Map, Value};
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::resource::http_error;

/// Anything that can take part in a drag-and-drop reorder.
pub trait Sortable {
    /// Identifier sent to the sort endpoint. `None` (or zero) means the
    /// item is not persisted yet and is skipped.
    fn sort_id(&self) -> Option<i64>;
}

impl<T: Sortable + ?Sized> Sortable for Arc<T> {
    fn sort_id(&self) -> Option<i64> {
        (**self).sort_id()
    }
}

impl Sortable for i64 {
    fn sort_id(&self) -> Option<i64> {
        Some(*self)
    }
}

/// Position among siblings: `sort_order` first, then `id` for ties.
pub trait Ordered {
    fn display_key(&self) -> (i32, i64);
}

impl<T: Ordered + ?Sized> Ordered for Arc<T> {
    fn display_key(&self) -> (i32, i64) {
        (**self).display_key()
    }
}

/// Sort siblings into display order. Stable and deterministic.
pub fn sort_siblings<T: Ordered>(items: &mut [T]) {
    items.sort_by_key(Ordered::display_key);
}

/// Custom id extraction for a reordered list.
pub type IdExtractor<T> = Arc<dyn Fn(&[T]) -> Vec<i64> + Send + Sync>;

/// Describes how a given entity type persists its order.
pub struct SortConfig<T> {
    /// Endpoint, absolute or relative to the API root. Required.
    pub api_url: Option<String>,
    /// HTTP method (default `PUT`).
    pub method: Method,
    /// Overrides the default `sort_id()` mapping.
    pub extract_ids: Option<IdExtractor<T>>,
    /// Extra payload fields, typically the owning scope id.
    pub additional_params: Map<String, Value>,
    /// Payload key for the id list (default `"ids"`).
    pub ids_key: String,
}

impl<T> SortConfig<T> {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: Some(api_url.into()),
            ..Self::default()
        }
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn ids_key(mut self, key: impl Into<String>) -> Self {
        self.ids_key = key.into();
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.additional_params.insert(key.into(), value.into());
        self
    }

    pub fn extract_ids(mut self, f: impl Fn(&[T]) -> Vec<i64> + Send + Sync + 'static) -> Self {
        self.extract_ids = Some(Arc::new(f));
        self
    }
}

impl<T: Sortable> SortConfig<T> {
    /// The ordered id sequence for `items`.
    pub fn ids(&self, items: &[T]) -> Vec<i64> {
        match self.extract_ids {
            Some(ref f) => f(items),
            None => items
                .iter()
                .filter_map(Sortable::sort_id)
                .filter(|id| *id != 0)
                .collect(),
        }
    }

    /// `additional_params` merged with `{ ids_key: [ids...] }`.
    pub fn payload(&self, items: &[T]) -> Value {
        let mut body = self.additional_params.clone();
        body.insert(self.ids_key.clone(), Value::from(self.ids(items)));
        Value::Object(body)
    }
}

impl<T> Default for SortConfig<T> {
    fn default() -> Self {
        Self {
            api_url: None,
            method: Method::PUT,
            extract_ids: None,
            additional_params: Map::new(),
            ids_key: "ids".into(),
        }
    }
}

impl<T> Clone for SortConfig<T> {
    fn clone(&self) -> Self {
        Self {
            api_url: self.api_url.clone(),
            method: self.method.clone(),
            extract_ids: self.extract_ids.clone(),
            additional_params: self.additional_params.clone(),
            ids_key: self.ids_key.clone(),
        }
    }
}

impl<T> fmt::Debug for SortConfig<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortConfig")
            .field("api_url", &self.api_url)
            .field("method", &self.method)
            .field("custom_extractor", &self.extract_ids.is_some())
            .field("additional_params", &self.additional_params)
            .field("ids_key", &self.ids_key)
            .finish()
    }
}

// ── Service ──────────────────────────────────────────────────────────

/// Persists a new display order with exactly one network call.
#[derive(Debug, Clone)]
pub struct SortService {
    http: reqwest::Client,
    base_url: Url,
}

impl SortService {
    pub fn new(http: reqwest::Client, base_url: &Url) -> Self {
        let mut base_url = base_url.clone();
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self { http, base_url }
    }

    /// Send the order of `items` to the configured endpoint.
    ///
    /// Fails with `Error::Configuration` before any I/O when `api_url` is
    /// missing. The response body is parsed as JSON and returned without
    /// interpretation (`Value::Null` for an empty body).
    pub async fn update_sort_order<T: Sortable>(
        &self,
        items: &[T],
        config: &SortConfig<T>,
    ) -> Result<Value, Error> {
        let api_url = config
            .api_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| Error::Configuration {
                message: "sort configuration is missing api_url".into(),
            })?;

        let url = self.resolve(api_url)?;
        let payload = config.payload(items);
        debug!(method = %config.method, %url, items = items.len(), "persisting sort order");

        let resp = self
            .http
            .request(config.method.clone(), url)
            .json(&payload)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(match http_error(status, &body) {
                Error::Http {
                    status,
                    message,
                    details,
                } => Error::Http {
                    status,
                    message: format!("sort order update failed with HTTP {status}: {message}"),
                    details,
                },
                other => other,
            });
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }

    fn resolve(&self, api_url: &str) -> Result<Url, Error> {
        match Url::parse(api_url) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                Ok(self.base_url.join(api_url.trim_start_matches('/'))?)
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Row(Option<i64>);

    impl Sortable for Row {
        fn sort_id(&self) -> Option<i64> {
            self.0
        }
    }

    struct Placed(i32, i64);

    impl Ordered for Placed {
        fn display_key(&self) -> (i32, i64) {
            (self.0, self.1)
        }
    }

    #[test]
    fn siblings_order_by_sort_order_then_id() {
        let mut items = vec![Placed(2, 1), Placed(0, 9), Placed(0, 4), Placed(1, 2)];
        sort_siblings(&mut items);
        let ids: Vec<i64> = items.iter().map(|p| p.1).collect();
        assert_eq!(ids, vec![4, 9, 2, 1]);
    }

    #[test]
    fn default_extraction_skips_missing_and_zero_ids() {
        let cfg: SortConfig<Row> = SortConfig::new("x");
        let ids = cfg.ids(&[Row(Some(3)), Row(None), Row(Some(0)), Row(Some(1))]);
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn payload_merges_params_under_configured_key() {
        let cfg: SortConfig<Row> = SortConfig::new("categories/sort-order")
            .param("cafe_id", 7)
            .ids_key("category_ids");
        let payload = cfg.payload(&[Row(Some(1)), Row(Some(2)), Row(Some(3))]);
        assert_eq!(payload, json!({ "cafe_id": 7, "category_ids": [1, 2, 3] }));
    }

    #[test]
    fn default_key_and_method() {
        let cfg: SortConfig<Row> = SortConfig::default();
        assert_eq!(cfg.ids_key, "ids");
        assert_eq!(cfg.method, Method::PUT);
        assert!(cfg.api_url.is_none());
    }

    #[test]
    fn custom_extractor_wins() {
        let cfg: SortConfig<Row> =
            SortConfig::new("x").extract_ids(|items: &[Row]| vec![items.len() as i64]);
        assert_eq!(cfg.ids(&[Row(Some(5)), Row(Some(6))]), vec![2]);
    }

    #[test]
    fn resolves_relative_and_absolute_urls() {
        let svc = SortService::new(
            reqwest::Client::new(),
            &Url::parse("http://localhost:9000/api").unwrap(),
        );
        assert_eq!(
            svc.resolve("/products/sort-order").unwrap().as_str(),
            "http://localhost:9000/api/products/sort-order"
        );
        assert_eq!(
            svc.resolve("https://other.example/sort").unwrap().as_str(),
            "https://other.example/sort"
        );
    }
}
