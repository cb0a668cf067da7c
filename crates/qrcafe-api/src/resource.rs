// Generic resource client
//
// One `ResourceClient` per backend resource, bound to a path prefix such as
// `categories`. It exposes the five HTTP verbs, unwraps the
// `{ success, data, error, details }` envelope, and maps failures onto
// `Error`. Repositories hold a `ResourceClient` instead of inheriting verb
// helpers from a base type.

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::ApiResponse;

/// HTTP verbs bound to `{base_url}/{prefix}/`.
///
/// Cheap to clone: the inner `reqwest::Client` is reference counted.
#[derive(Debug, Clone)]
pub struct ResourceClient {
    http: reqwest::Client,
    base_url: Url,
    prefix: String,
}

impl ResourceClient {
    /// Bind the verbs to `prefix` under `base_url`.
    ///
    /// `base_url` is the API root (e.g. `https://api.example.com/api`); a
    /// trailing slash is added when missing so relative joins stay inside it.
    pub fn new(http: reqwest::Client, base_url: &Url, prefix: &str) -> Self {
        Self {
            http,
            base_url: normalize_base_url(base_url),
            prefix: prefix.trim_matches('/').to_owned(),
        }
    }

    /// The resource path prefix (e.g. `"cafes"`).
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The normalized API root this resource hangs off.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Resolve a path relative to this resource: `{base}/{prefix}/{path}`.
    pub fn url(&self, path: &str) -> Result<Url, Error> {
        let path = path.trim_start_matches('/');
        let relative = if path.is_empty() {
            self.prefix.clone()
        } else {
            format!("{}/{path}", self.prefix)
        };
        Ok(self.base_url.join(&relative)?)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        self.send::<T, ()>(Method::GET, path, None).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        self.send(Method::POST, path, Some(body)).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        self.send(Method::PUT, path, Some(body)).await
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        self.send(Method::PATCH, path, Some(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        self.send::<T, ()>(Method::DELETE, path, None).await
    }

    async fn send<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("{method} {url}");

        let mut request = self.http.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let resp = request.send().await?;
        handle_response(resp).await
    }
}

// ── Response handling ────────────────────────────────────────────────

/// Unwrap the envelope on success, or build an `Error::Http` from it.
pub(crate) async fn handle_response<T: DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, Error> {
    let status = resp.status();
    let body = resp.text().await?;

    if !status.is_success() {
        return Err(http_error(status, &body));
    }

    if body.trim().is_empty() {
        return decode_value(serde_json::Value::Null, &body);
    }

    let envelope: ApiResponse<serde_json::Value> =
        serde_json::from_str(&body).map_err(|e| deserialization_error(&e, &body))?;

    if !envelope.success {
        return Err(Error::Http {
            status: status.as_u16(),
            message: envelope
                .error
                .unwrap_or_else(|| "request reported failure".into()),
            details: envelope.details,
        });
    }

    decode_value(envelope.data.unwrap_or(serde_json::Value::Null), &body)
}

/// Build the error for a non-2xx response, preferring the envelope's message.
pub(crate) fn http_error(status: reqwest::StatusCode, body: &str) -> Error {
    match serde_json::from_str::<ApiResponse<serde_json::Value>>(body) {
        Ok(env) => Error::Http {
            status: status.as_u16(),
            message: env.error.unwrap_or_else(|| status.to_string()),
            details: env.details,
        },
        Err(_) => Error::Http {
            status: status.as_u16(),
            message: if body.is_empty() {
                status.to_string()
            } else {
                body.to_owned()
            },
            details: None,
        },
    }
}

fn decode_value<T: DeserializeOwned>(value: serde_json::Value, body: &str) -> Result<T, Error> {
    serde_json::from_value(value).map_err(|e| deserialization_error(&e, body))
}

fn deserialization_error(err: &serde_json::Error, body: &str) -> Error {
    let preview: String = body.chars().take(200).collect();
    Error::Deserialization {
        message: format!("{err} (body preview: {preview:?})"),
        body: body.to_owned(),
    }
}

fn normalize_base_url(raw: &Url) -> Url {
    let mut url = raw.clone();
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str, prefix: &str) -> ResourceClient {
        ResourceClient::new(reqwest::Client::new(), &Url::parse(base).unwrap(), prefix)
    }

    #[test]
    fn url_joins_prefix_and_path() {
        let c = client("http://localhost:8080/api", "categories");
        assert_eq!(
            c.url("cafe/7").unwrap().as_str(),
            "http://localhost:8080/api/categories/cafe/7"
        );
        assert_eq!(
            c.url("/sort-order").unwrap().as_str(),
            "http://localhost:8080/api/categories/sort-order"
        );
    }

    #[test]
    fn empty_path_targets_prefix_itself() {
        let c = client("http://localhost:8080/", "/cafes/");
        assert_eq!(c.prefix(), "cafes");
        assert_eq!(c.url("").unwrap().as_str(), "http://localhost:8080/cafes");
    }

    #[test]
    fn http_error_prefers_envelope_message() {
        let err = http_error(
            reqwest::StatusCode::BAD_REQUEST,
            r#"{"success":false,"error":"Invalid id","details":{"id":"abc"}}"#,
        );
        match err {
            Error::Http {
                status,
                message,
                details,
            } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Invalid id");
                assert!(details.is_some());
            }
            other => panic!("expected Http, got {other:?}"),
        }
    }

    #[test]
    fn http_error_falls_back_to_raw_body() {
        let err = http_error(reqwest::StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(err.status(), Some(502));
        assert!(err.to_string().contains("upstream down"));
    }
}
