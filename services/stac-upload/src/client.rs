//! Thin client for a STAC transaction API.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, Method, StatusCode, Url};
use serde_json::Value;
use tracing::{debug, warn};

use crate::auth::Auth;

/// Overall timeout for every request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(180);

/// Build the HTTP client. Certificate verification is off so that test
/// deployments with self-signed certificates can be reached.
pub fn http_client() -> Result<Client> {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .danger_accept_invalid_certs(true)
        .build()
        .context("Failed to create HTTP client")
}

/// Resolve `path` against the API root (RFC 3986 reference resolution).
///
/// A root without a trailing slash loses its last segment, as browsers do.
pub fn resolve(base: &Url, path: &str) -> Result<Url> {
    base.join(path)
        .with_context(|| format!("Cannot resolve '{}' against {}", path, base))
}

/// Status and raw body of an API response.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: StatusCode,
    pub body: String,
}

impl Reply {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

pub struct StacClient {
    http: Client,
    base: Url,
    auth: Auth,
}

impl StacClient {
    pub fn new(http: Client, base: &str, auth: Auth) -> Result<Self> {
        let base = Url::parse(base).with_context(|| format!("Invalid API URL '{}'", base))?;
        if !base.path().ends_with('/') {
            warn!(url = %base, "API URL has no trailing slash, its last path segment is replaced when joining");
        }
        Ok(Self { http, base, auth })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    async fn send(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Reply> {
        let url = resolve(&self.base, path)?;
        let mut request = self.auth.apply(self.http.request(method.clone(), url.clone()));
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("{} {} failed", method, url))?;
        let status = response.status();
        let body = response.text().await.context("Failed to read response body")?;
        debug!(method = %method, url = %url, status = status.as_u16(), "Request complete");

        Ok(Reply { status, body })
    }

    pub async fn list_collections(&self) -> Result<Reply> {
        self.send(Method::GET, "collections", None).await
    }

    pub async fn get_collection(&self, id: &str) -> Result<Reply> {
        self.send(Method::GET, &format!("collections/{}", id), None).await
    }

    pub async fn add_collection(&self, collection: &Value) -> Result<Reply> {
        self.send(Method::POST, "collections", Some(collection)).await
    }

    pub async fn modify_collection(&self, collection: &Value) -> Result<Reply> {
        let id = document_str(collection, "id")?;
        self.send(Method::PUT, &format!("collections/{}", id), Some(collection))
            .await
    }

    pub async fn remove_collection(&self, id: &str) -> Result<Reply> {
        self.send(Method::DELETE, &format!("collections/{}", id), None)
            .await
    }

    pub async fn get_items(&self, collection_id: &str) -> Result<Reply> {
        self.send(Method::GET, &format!("collections/{}/items", collection_id), None)
            .await
    }

    /// POST an item to the collection named by its `collection` field.
    pub async fn add_item(&self, item: &Value) -> Result<Reply> {
        let collection = document_str(item, "collection")?;
        self.send(Method::POST, &format!("collections/{}/items", collection), Some(item))
            .await
    }

    pub async fn remove_item(&self, item: &Value) -> Result<Reply> {
        let collection = document_str(item, "collection")?;
        let id = document_str(item, "id")?;
        self.send(
            Method::DELETE,
            &format!("collections/{}/items/{}", collection, id),
            None,
        )
        .await
    }
}

/// A required string field of a STAC document.
pub fn document_str<'a>(doc: &'a Value, key: &str) -> Result<&'a str> {
    doc.get(key)
        .and_then(Value::as_str)
        .with_context(|| format!("Document has no string '{}' field", key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_relative_to_root() {
        let base = Url::parse("https://h/api/").unwrap();
        assert_eq!(
            resolve(&base, "collections/x/items").unwrap().as_str(),
            "https://h/api/collections/x/items"
        );
    }

    #[test]
    fn test_resolve_without_trailing_slash() {
        let base = Url::parse("https://h/api").unwrap();
        assert_eq!(resolve(&base, "collections").unwrap().as_str(), "https://h/collections");
    }

    #[test]
    fn test_document_str() {
        let item = json!({"id": "abc", "collection": 7});
        assert_eq!(document_str(&item, "id").unwrap(), "abc");
        assert!(document_str(&item, "collection").is_err());
        assert!(document_str(&item, "missing").is_err());
    }
}
